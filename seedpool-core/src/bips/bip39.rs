// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP39
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>
//!
//! Wordlists, checksum and PBKDF2 come from the `bip39` crate; this module
//! only wires them to the entropy pool.

pub use bip39::{Language, Mnemonic};

use crate::entropy::{pool, EntropyCollector};
use crate::types::{self, SecretBytes, Seed, WordCount};
use crate::util::nfkd;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Strength(#[from] types::Error),
    #[error(transparent)]
    BIP39(#[from] bip39::Error),
    #[error(transparent)]
    Pool(#[from] pool::Error),
}

/// New mnemonic from `word_count.entropy_len()` bytes of pooled entropy
pub fn generate(
    collector: &mut EntropyCollector,
    word_count: WordCount,
    language: Language,
) -> Result<Mnemonic, Error> {
    let entropy: SecretBytes = collector.get_entropy(word_count.entropy_len())?;
    from_entropy(&entropy, language)
}

/// [`generate`] with the word count and language of the collector's [`Config`](crate::config::Config)
pub fn generate_default(collector: &mut EntropyCollector) -> Result<Mnemonic, Error> {
    let word_count: WordCount = collector.config().word_count;
    let language: Language = collector.config().language;
    generate(collector, word_count, language)
}

/// Same as [`generate`] with the strength given in bits
pub fn generate_with_strength(
    collector: &mut EntropyCollector,
    bits: usize,
    language: Language,
) -> Result<Mnemonic, Error> {
    let word_count = WordCount::from_bits(bits)?;
    generate(collector, word_count, language)
}

pub fn from_entropy<T>(entropy: T, language: Language) -> Result<Mnemonic, Error>
where
    T: AsRef<[u8]>,
{
    let entropy: &[u8] = entropy.as_ref();
    WordCount::from_bits(entropy.len() * 8)?;
    Ok(Mnemonic::from_entropy_in(language, entropy)?)
}

pub fn parse<S>(mnemonic: S, language: Language) -> Result<Mnemonic, Error>
where
    S: AsRef<str>,
{
    let normalized: String = nfkd::normalize(mnemonic);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    Ok(Mnemonic::parse_in_normalized(language, &words.join(" "))?)
}

/// Check words and checksum
pub fn validate<S>(mnemonic: S, language: Language) -> bool
where
    S: AsRef<str>,
{
    parse(mnemonic, language).is_ok()
}

/// 64-byte BIP39 seed. The passphrase is NFKD normalized.
pub fn to_seed<S>(mnemonic: &Mnemonic, passphrase: Option<S>) -> SecretBytes
where
    S: Into<String>,
{
    Seed::new(mnemonic.clone(), passphrase).to_bytes()
}
