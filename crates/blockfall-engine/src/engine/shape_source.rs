use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Shape;

/// Endless, reproducible stream of shapes drawn uniformly from the catalog.
///
/// Every shape is equally likely on every draw; there is no bag and no
/// history. Two sources built from the same [`ShapeSeed`] yield the same
/// sequence.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ShapeSeed, ShapeSource};
///
/// let seed = ShapeSeed::from(7_u64);
/// let a: Vec<_> = ShapeSource::with_seed(seed).take(10).collect();
/// let b: Vec<_> = ShapeSource::with_seed(seed).take(10).collect();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct ShapeSource {
    rng: Pcg32,
}

impl Default for ShapeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeSource {
    /// Creates a source with a random seed.
    ///
    /// For deterministic sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl Iterator for ShapeSource {
    type Item = Shape;

    fn next(&mut self) -> Option<Shape> {
        Some(self.rng.random())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Seed for deterministic shape generation.
///
/// A 128-bit seed for the shape source's PCG generator. It is written as a
/// 32-character hex string, both by serde and by `Display`/`FromStr`.
///
/// # Example
///
/// ```
/// use blockfall_engine::ShapeSeed;
/// use rand::Rng as _;
///
/// let seed: ShapeSeed = rand::rng().random();
/// let parsed: ShapeSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeSeed([u8; 16]);

/// A seed string was not 32 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    reason: String,
}

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl From<u64> for ShapeSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for ShapeSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}
