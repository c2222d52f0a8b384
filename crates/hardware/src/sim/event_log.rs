//! Event log writer.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::events::{Event, EventSink};
use crate::config::ConfigError;

/// On-disk log format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One human-readable line per event, e.g. `TLB Miss: VPN 0x000`.
    #[default]
    Text,
    /// One JSON object per line, tagged by `event`.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::UnknownLogFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Writes events to `W`.
///
/// The sink interface cannot fail, so the first write error is parked and
/// later events are dropped; [`EventLog::finish`] reports it.
pub struct EventLog<W: Write> {
    writer: W,
    format: LogFormat,
    error: Option<io::Error>,
    written: u64,
}

impl<W: Write> EventLog<W> {
    pub fn new(writer: W, format: LogFormat) -> Self {
        Self {
            writer,
            format,
            error: None,
            written: 0,
        }
    }

    /// Number of events written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn write_event(&mut self, event: &Event) -> io::Result<()> {
        match self.format {
            LogFormat::Text => writeln!(self.writer, "{event}"),
            LogFormat::Json => {
                serde_json::to_writer(&mut self.writer, event)?;
                self.writer.write_all(b"\n")
            }
        }
    }

    /// Flushes and hands back the writer, or the first error hit on the way.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventSink for EventLog<W> {
    fn record(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        match self.write_event(&event) {
            Ok(()) => self.written += 1,
            Err(err) => {
                log::warn!("event log write failed, dropping further events: {err}");
                self.error = Some(err);
            }
        }
    }
}
