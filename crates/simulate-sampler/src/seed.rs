//! Seeds for reproducible sampling.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Value used to initialize a sampler's random generator.
///
/// Decimal text that fits in a `u64` is used as is. Any other text is folded
/// into a `u64` with FNV-1a, which is stable across platforms and releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    pub fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Seed::Number(n),
            Err(_) => Seed::Text(s.to_string()),
        }
    }

    /// The 64-bit value handed to `SeedableRng::seed_from_u64`.
    pub fn to_u64(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(text) => fnv1a(text.as_bytes()),
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::parse(s)
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::parse(&s)
    }
}

impl FromStr for Seed {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Seed::parse(s))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(text) => f.write_str(text),
        }
    }
}
