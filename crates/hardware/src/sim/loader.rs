//! Trace file reader and writer.
//!
//! A trace is a decimal access count followed by whitespace-separated
//! hexadecimal virtual addresses (`0x` prefix optional):
//!
//! ```text
//! 3
//! 0x000
//! 0x1f8
//! 0x03c
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::common::VirtAddr;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read trace {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write trace {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trace is empty, expected an access count on the first line")]
    MissingHeader,

    #[error("invalid access count '{0}'")]
    InvalidHeader(String),

    #[error("invalid virtual address '{token}' (entry {index})")]
    InvalidAddress { token: String, index: usize },

    #[error("virtual address '{token}' (entry {index}) does not fit in 12 bits")]
    AddressOutOfRange { token: String, index: usize },
}

/// A parsed access trace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    /// Count announced by the header; informational only.
    pub declared: usize,
    pub addresses: Vec<VirtAddr>,
}

impl Trace {
    pub fn new(addresses: Vec<VirtAddr>) -> Self {
        Self {
            declared: addresses.len(),
            addresses,
        }
    }

    pub fn parse(content: &str) -> Result<Self, InputError> {
        let mut tokens = content.split_whitespace();
        let header = tokens.next().ok_or(InputError::MissingHeader)?;
        let declared: usize = header
            .parse()
            .map_err(|_| InputError::InvalidHeader(header.to_string()))?;

        let addresses = tokens
            .enumerate()
            .map(|(index, token)| parse_address(token, index))
            .collect::<Result<Vec<_>, _>>()?;

        if addresses.len() != declared {
            log::warn!(
                "trace header announces {declared} accesses but {} were read",
                addresses.len()
            );
        }

        Ok(Trace {
            declared,
            addresses,
        })
    }

    /// Serializes in the input format.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(6 * (self.addresses.len() + 1));
        let _ = writeln!(out, "{}", self.addresses.len());
        for va in &self.addresses {
            let _ = writeln!(out, "{va}");
        }
        out
    }
}

fn parse_address(token: &str, index: usize) -> Result<VirtAddr, InputError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    let raw = u32::from_str_radix(digits, 16).map_err(|_| InputError::InvalidAddress {
        token: token.to_string(),
        index,
    })?;

    VirtAddr::checked(raw).ok_or_else(|| InputError::AddressOutOfRange {
        token: token.to_string(),
        index,
    })
}

pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Trace, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Trace::parse(&content)
}

pub fn write_trace<P: AsRef<Path>>(path: P, trace: &Trace) -> Result<(), InputError> {
    let path = path.as_ref();
    fs::write(path, trace.render()).map_err(|source| InputError::Write {
        path: path.display().to_string(),
        source,
    })
}
