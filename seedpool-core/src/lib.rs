// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

#![doc = include_str!("../README.md")]

pub use bip39;
pub use bitcoin::hashes;

pub mod bips;
pub mod config;
pub mod crypto;
pub mod entropy;
pub mod error;
pub mod slips;
pub mod system;
pub mod types;
pub mod util;

pub use self::config::Config;
pub use self::entropy::{EntropyCollector, EntropyPool, PoolStatus};
pub use self::error::{Error, Result};
pub use self::system::SystemReport;
pub use self::types::{SecretBytes, Seed, WordCount};
