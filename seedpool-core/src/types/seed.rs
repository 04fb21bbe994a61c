// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;

use bip39::Mnemonic;
use zeroize::Zeroize;

use super::SecretBytes;
use crate::util::nfkd;

/// BIP39 mnemonic with an optional passphrase
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    mnemonic: Mnemonic,
    passphrase: Option<String>,
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sensitive>")
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        // Mnemonic has no zeroize support: overwrite it with the all-zero one
        if let Ok(blank) = Mnemonic::from_entropy(&[0u8; 16]) {
            self.mnemonic = blank;
        }
        if let Some(passphrase) = self.passphrase.as_mut() {
            passphrase.zeroize();
        }
        self.passphrase = None;
    }
}

impl Seed {
    pub fn new<S>(mnemonic: Mnemonic, passphrase: Option<S>) -> Self
    where
        S: Into<String>,
    {
        Self {
            mnemonic,
            passphrase: passphrase
                .map(|p| nfkd::normalize(p.into()))
                .filter(|p| !p.is_empty()),
        }
    }

    pub fn from_mnemonic(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            passphrase: None,
        }
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref()
    }

    /// 64-byte BIP39 seed (PBKDF2-HMAC-SHA512, 2048 rounds)
    pub fn to_bytes(&self) -> SecretBytes {
        let mut seed: [u8; 64] = self
            .mnemonic
            .to_seed_normalized(self.passphrase.as_deref().unwrap_or_default());
        let bytes = SecretBytes::from_slice(&seed);
        seed.zeroize();
        bytes
    }

    pub fn to_hex(&self) -> String {
        self.to_bytes().to_hex()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_seed() {
        let mnemonic = Mnemonic::from_str("easy uncover favorite crystal bless differ energy seat ecology match carry group refuse together chat observe hidden glad brave month diesel sustain depth salt").unwrap();
        let passphrase: Option<&str> = Some("mypassphrase");
        let seed = Seed::new(mnemonic, passphrase);
        assert_eq!(&seed.to_hex(), "fb826595a0d679f5e9f8c799bd1decb8dc2ad3fb4e39a1ffaa4708a150e0e81ae55d3f340a188cd6188a2b76601aeae16945b36ae0ecfced9645029796c33713")
    }

    #[test]
    fn test_trezor_vector() {
        let mnemonic = Mnemonic::from_str("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about").unwrap();
        let seed = Seed::new(mnemonic, Some("TREZOR"));
        assert_eq!(&seed.to_hex(), "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04");
        assert_eq!(format!("{seed:?}"), "<sensitive>");
    }

    #[test]
    fn test_empty_passphrase() {
        let mnemonic = Mnemonic::from_entropy(&[0u8; 16]).unwrap();
        let seed = Seed::new(mnemonic.clone(), Some(""));
        assert_eq!(seed.passphrase(), None);
        assert_eq!(seed.to_bytes(), Seed::from_mnemonic(mnemonic).to_bytes());
    }
}
