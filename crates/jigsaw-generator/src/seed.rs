use std::{fmt, str::FromStr};

use rand::Rng as _;
use sha2::{Digest as _, Sha256};

/// Error returned when parsing a [`LayoutSeed`] from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseLayoutSeedError {
    /// The string does not contain exactly 64 hex digits.
    #[display("layout seed must be 64 hex digits, got {len} characters")]
    InvalidLength {
        /// Number of characters in the input.
        len: usize,
    },
    /// The string contains a character that is not a hex digit.
    #[display("invalid hex digit {ch:?} at position {position}")]
    InvalidDigit {
        /// Character offset of the offending digit.
        position: usize,
        /// The offending character.
        ch: char,
    },
}

/// A 256-bit seed for layout generation.
///
/// Displayed and parsed as 64 lowercase hex digits.
///
/// # Example
///
/// ```
/// use jigsaw_generator::LayoutSeed;
///
/// let seed = LayoutSeed::from_phrase("level-7");
/// let parsed: LayoutSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSeed([u8; 32]);

impl LayoutSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Creates a seed from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::rng().random())
    }

    /// Derives a seed from an arbitrary phrase by hashing it with SHA-256.
    ///
    /// Useful for shared or daily puzzles where every player should see the
    /// same scramble.
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self(Sha256::digest(phrase.as_bytes()).into())
    }
}

impl fmt::Display for LayoutSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LayoutSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayoutSeed({self})")
    }
}

impl FromStr for LayoutSeed {
    type Err = ParseLayoutSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 64 {
            return Err(ParseLayoutSeedError::InvalidLength { len });
        }

        let mut bytes = [0; 32];
        let mut nibbles = s.chars().enumerate().map(|(position, ch)| {
            ch.to_digit(16)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(ParseLayoutSeedError::InvalidDigit { position, ch })
        });
        for byte in &mut bytes {
            let (Some(high), Some(low)) = (nibbles.next(), nibbles.next()) else {
                return Err(ParseLayoutSeedError::InvalidLength { len });
            };
            *byte = (high? << 4) | low?;
        }
        Ok(Self(bytes))
    }
}
