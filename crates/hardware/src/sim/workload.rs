//! Synthetic access traces.
//!
//! Uniform traces pick every page with equal probability. Zipfian traces rank
//! the 512 pages in a seeded random order and draw rank `k` with probability
//! proportional to `1 / k^s`, which concentrates accesses on a few hot pages
//! as `s` grows. Offsets are uniform within the page.

use std::fmt;

use super::loader::Trace;
use crate::common::constants::{NUM_PAGES, PAGE_SIZE};
use crate::common::{VirtAddr, Vpn};
use crate::config::ConfigError;

/// Default trace length.
pub const DEFAULT_ACCESSES: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distribution {
    Uniform,
    Zipfian { skew: f64 },
}

impl Distribution {
    /// Parses `uniform` or `zipfian`; the skew only applies to the latter and
    /// must be positive.
    pub fn from_name(name: &str, skew: f64) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Distribution::Uniform),
            "zipf" | "zipfian" if skew > 0.0 => Ok(Distribution::Zipfian { skew }),
            "zipf" | "zipfian" => Err(ConfigError::InvalidSkew(skew)),
            _ => Err(ConfigError::UnknownDistribution(name.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Uniform => write!(f, "uniform"),
            Distribution::Zipfian { skew } => write!(f, "zipfian(s={skew})"),
        }
    }
}

/// xorshift64 generator; deterministic for a given seed.
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift.
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform integer in `0..bound`.
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Generates `count` addresses drawn from `dist`.
pub fn generate(dist: Distribution, count: usize, seed: u64) -> Trace {
    let mut rng = XorShift64::new(seed);
    let mut draw_page: Box<dyn FnMut(&mut XorShift64) -> usize> = match dist {
        Distribution::Uniform => Box::new(|rng: &mut XorShift64| rng.below(NUM_PAGES)),
        Distribution::Zipfian { skew } => {
            let sampler = ZipfSampler::new(skew, &mut rng);
            Box::new(move |rng: &mut XorShift64| sampler.sample(rng))
        }
    };

    let addresses = (0..count)
        .map(|_| {
            let vpn = Vpn::new(draw_page(&mut rng) as u16);
            let offset = rng.below(PAGE_SIZE) as u16;
            vpn.with_offset(offset)
        })
        .collect::<Vec<VirtAddr>>();

    Trace::new(addresses)
}

/// Inverse-CDF sampler over shuffled page ranks.
struct ZipfSampler {
    cdf: Vec<f64>,
    pages: Vec<usize>,
}

impl ZipfSampler {
    fn new(skew: f64, rng: &mut XorShift64) -> Self {
        let weights: Vec<f64> = (1..=NUM_PAGES).map(|k| 1.0 / (k as f64).powf(skew)).collect();
        let total: f64 = weights.iter().sum();

        let mut acc = 0.0;
        let cdf = weights
            .iter()
            .map(|w| {
                acc += w / total;
                acc
            })
            .collect();

        // Fisher-Yates, so hot pages are spread over the address space.
        let mut pages: Vec<usize> = (0..NUM_PAGES).collect();
        for i in (1..pages.len()).rev() {
            let j = rng.below(i + 1);
            pages.swap(i, j);
        }

        Self { cdf, pages }
    }

    fn sample(&self, rng: &mut XorShift64) -> usize {
        let u = rng.unit();
        let rank = self.cdf.partition_point(|&c| c <= u).min(self.pages.len() - 1);
        self.pages[rank]
    }
}
