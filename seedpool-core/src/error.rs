// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use crate::bips::bip39;
use crate::entropy::{pool, source};
use crate::slips::slip39;
use crate::util::hex;
use crate::{config, types};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entropy pool error
    #[error(transparent)]
    Pool(#[from] pool::Error),
    /// Entropy source error
    #[error(transparent)]
    Source(#[from] source::Error),
    /// BIP39 error
    #[error(transparent)]
    BIP39(#[from] bip39::Error),
    /// SLIP39 error
    #[error(transparent)]
    SLIP39(#[from] slip39::Error),
    /// Config error
    #[error(transparent)]
    Config(#[from] config::Error),
    /// Word count or strength error
    #[error(transparent)]
    Types(#[from] types::Error),
    /// Hex error
    #[error(transparent)]
    Hex(#[from] hex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(bits: usize) -> Result<types::WordCount> {
        Ok(types::WordCount::from_bits(bits)?)
    }

    #[test]
    fn test_conversion() {
        assert!(strength(256).is_ok());
        let err = strength(100).unwrap_err();
        assert!(matches!(err, Error::Types(types::Error::InvalidStrength(100))));
        assert!(err.to_string().contains("100"));

        let err: Error = pool::Error::PoolNotReady {
            accepted: 1,
            required: 3,
        }
        .into();
        assert!(matches!(err, Error::Pool(_)));
    }
}
