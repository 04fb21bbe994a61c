// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;

use serde::{Deserialize, Serialize};

pub mod secret;
pub mod seed;

pub use self::secret::SecretBytes;
pub use self::seed::Seed;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Unsupported mnemonic strength: {0} (expected 128, 160, 192, 224 or 256 bits)")]
    InvalidStrength(usize),
    #[error("Unsupported word count: {0} (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount(usize),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WordCount {
    W12 = 12,
    W15 = 15,
    W18 = 18,
    W21 = 21,
    #[default]
    W24 = 24,
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} words", self.as_usize())
    }
}

impl WordCount {
    pub const ALL: [WordCount; 5] = [Self::W12, Self::W15, Self::W18, Self::W21, Self::W24];

    pub fn as_usize(&self) -> usize {
        *self as usize
    }

    /// Entropy bits encoded by this number of words
    pub fn entropy_bits(&self) -> usize {
        self.as_usize() * 32 / 3
    }

    pub fn entropy_len(&self) -> usize {
        self.entropy_bits() / 8
    }

    pub fn from_bits(bits: usize) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.entropy_bits() == bits)
            .ok_or(Error::InvalidStrength(bits))
    }
}

impl TryFrom<usize> for WordCount {
    type Error = Error;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_usize() == words)
            .ok_or(Error::InvalidWordCount(words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_strength() {
        let expected = [(12, 128, 16), (15, 160, 20), (18, 192, 24), (21, 224, 28), (24, 256, 32)];
        for (words, bits, len) in expected {
            let word_count = WordCount::try_from(words).unwrap();
            assert_eq!(word_count.entropy_bits(), bits);
            assert_eq!(word_count.entropy_len(), len);
            assert_eq!(WordCount::from_bits(bits).unwrap(), word_count);
        }
    }

    #[test]
    fn test_invalid_strength() {
        assert_eq!(WordCount::from_bits(64), Err(Error::InvalidStrength(64)));
        assert_eq!(WordCount::from_bits(129), Err(Error::InvalidStrength(129)));
        assert_eq!(WordCount::from_bits(512), Err(Error::InvalidStrength(512)));
        assert_eq!(WordCount::try_from(13), Err(Error::InvalidWordCount(13)));
    }
}
