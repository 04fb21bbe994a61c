// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! SLIP39
//!
//! <https://github.com/satoshilabs/slips/blob/master/slip-0039.md>
//!
//! Shamir splitting is an optional capability: use [`splitter`] to get either
//! the real implementation (cargo feature `slip39`) or a stub that reports it
//! as unavailable.

use serde::{Deserialize, Serialize};

use crate::types::SecretBytes;
use crate::util::nfkd;

pub const MAX_GROUPS: u8 = 16;
pub const MAX_MEMBERS: u8 = 16;
pub const MIN_SECRET_LEN: usize = 16;
pub const DEFAULT_ITERATION_EXPONENT: u8 = 1;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid SLIP39 configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid master secret: {0}")]
    InvalidSecret(String),
    #[error("No shares provided")]
    NoShares,
    #[error("SLIP39 support not available in this build")]
    Unavailable,
    #[error("SLIP39: {0}")]
    Slip39(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Shares needed to recover this group
    pub member_threshold: u8,
    pub member_count: u8,
}

impl GroupSpec {
    pub fn new(member_threshold: u8, member_count: u8) -> Self {
        Self {
            member_threshold,
            member_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Groups needed to recover the secret
    pub group_threshold: u8,
    pub groups: Vec<GroupSpec>,
    pub iteration_exponent: u8,
}

impl SplitConfig {
    pub fn new(group_threshold: u8, groups: Vec<GroupSpec>) -> Self {
        Self {
            group_threshold,
            groups,
            iteration_exponent: DEFAULT_ITERATION_EXPONENT,
        }
    }

    /// Single group, `threshold` of `count`
    pub fn single(threshold: u8, count: u8) -> Self {
        Self::new(1, vec![GroupSpec::new(threshold, count)])
    }

    pub fn validate(&self) -> Result<(), Error> {
        let group_count: usize = self.groups.len();
        if group_count == 0 || group_count > MAX_GROUPS as usize {
            return Err(Error::InvalidConfig(format!(
                "group count must be between 1 and {MAX_GROUPS}"
            )));
        }

        if self.group_threshold == 0 || self.group_threshold as usize > group_count {
            return Err(Error::InvalidConfig(format!(
                "group threshold must be between 1 and {group_count}"
            )));
        }

        for (index, group) in self.groups.iter().enumerate() {
            let n: usize = index + 1;
            if group.member_count == 0 || group.member_count > MAX_MEMBERS {
                return Err(Error::InvalidConfig(format!(
                    "group {n}: member count must be between 1 and {MAX_MEMBERS}"
                )));
            }
            if group.member_threshold == 0 || group.member_threshold > group.member_count {
                return Err(Error::InvalidConfig(format!(
                    "group {n}: member threshold must be between 1 and {}",
                    group.member_count
                )));
            }
            if group.member_threshold == 1 && group.member_count > 1 {
                return Err(Error::InvalidConfig(format!(
                    "group {n}: a member threshold of 1 requires a single member"
                )));
            }
        }

        Ok(())
    }
}

fn check_secret(secret: &[u8]) -> Result<(), Error> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(Error::InvalidSecret(format!(
            "must be at least {MIN_SECRET_LEN} bytes"
        )));
    }
    if secret.len() % 2 != 0 {
        return Err(Error::InvalidSecret(String::from("length must be even")));
    }
    Ok(())
}

/// Shamir backup of a master secret
pub trait ShamirSplitter {
    fn is_available(&self) -> bool;

    /// Shares grouped as configured: one `Vec` per group, one mnemonic per member
    fn split(
        &self,
        master_secret: &[u8],
        config: &SplitConfig,
        passphrase: &str,
    ) -> Result<Vec<Vec<String>>, Error>;

    /// Recover the master secret from enough shares
    fn combine(&self, shares: &[String], passphrase: &str) -> Result<SecretBytes, Error>;
}

/// Stand-in when SLIP39 support is not compiled in
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl ShamirSplitter for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn split(&self, _: &[u8], _: &SplitConfig, _: &str) -> Result<Vec<Vec<String>>, Error> {
        Err(Error::Unavailable)
    }

    fn combine(&self, _: &[String], _: &str) -> Result<SecretBytes, Error> {
        Err(Error::Unavailable)
    }
}

#[cfg(feature = "slip39")]
pub use self::sssmc::Slip39;

#[cfg(feature = "slip39")]
mod sssmc {
    use super::*;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Slip39;

    impl ShamirSplitter for Slip39 {
        fn is_available(&self) -> bool {
            true
        }

        fn split(
            &self,
            master_secret: &[u8],
            config: &SplitConfig,
            passphrase: &str,
        ) -> Result<Vec<Vec<String>>, Error> {
            config.validate()?;
            check_secret(master_secret)?;

            let passphrase: String = nfkd::normalize(passphrase);
            let groups: Vec<(u8, u8)> = config
                .groups
                .iter()
                .map(|g| (g.member_threshold, g.member_count))
                .collect();

            let group_shares = sssmc39::generate_mnemonics(
                config.group_threshold,
                &groups,
                master_secret,
                &passphrase,
                config.iteration_exponent,
            )
            .map_err(|e| Error::Slip39(e.to_string()))?;

            let mut shares: Vec<Vec<String>> = Vec::with_capacity(group_shares.len());
            for group in group_shares.iter() {
                let members: Vec<Vec<String>> = group
                    .mnemonic_list()
                    .map_err(|e| Error::Slip39(e.to_string()))?;
                shares.push(members.into_iter().map(|words| words.join(" ")).collect());
            }
            Ok(shares)
        }

        fn combine(&self, shares: &[String], passphrase: &str) -> Result<SecretBytes, Error> {
            let mnemonics: Vec<Vec<String>> = shares
                .iter()
                .map(|share| {
                    nfkd::normalize(share)
                        .split_whitespace()
                        .map(|w| w.to_lowercase())
                        .collect::<Vec<String>>()
                })
                .filter(|words| !words.is_empty())
                .collect();

            if mnemonics.is_empty() {
                return Err(Error::NoShares);
            }

            let passphrase: String = nfkd::normalize(passphrase);
            let secret: Vec<u8> = sssmc39::combine_mnemonics(&mnemonics, &passphrase)
                .map_err(|e| Error::Slip39(e.to_string()))?;
            Ok(SecretBytes::from(secret))
        }
    }
}

/// Best SLIP39 implementation compiled in this build
pub fn splitter() -> Box<dyn ShamirSplitter> {
    #[cfg(feature = "slip39")]
    {
        Box::new(Slip39)
    }
    #[cfg(not(feature = "slip39"))]
    {
        log::warn!("SLIP39 support not compiled in");
        Box::new(Unavailable)
    }
}
