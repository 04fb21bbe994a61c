// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Multi-source entropy
//!
//! [`EntropyCollector`] gathers one [`SourceSample`] per origin into an
//! [`EntropyPool`], which refuses to produce output until enough distinct
//! origins contributed.

pub mod collector;
pub mod pool;
pub mod source;

pub use self::collector::{EntropyCollector, SourceFailure};
pub use self::pool::{EntropyPool, PoolStatus, SessionState};
pub use self::source::SourceSample;
