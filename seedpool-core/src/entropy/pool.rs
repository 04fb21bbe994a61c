// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Entropy pool
//!
//! Samples are folded into a single running SHA-512 engine, at most once per
//! origin. Output is gated on a minimum number of distinct origins and
//! expanded in counter mode: block `i` is `SHA-512(base || be32(i))`, where
//! `base` is the digest of the pool at extraction time.

use core::fmt;

use bitcoin::hashes::{sha512, Hash, HashEngine};
use serde::Serialize;

use super::source::SourceSample;
use crate::types::SecretBytes;

const BLOCK_LEN: usize = 64;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Entropy pool not ready: {accepted} of {required} required sources collected")]
    PoolNotReady { accepted: usize, required: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collecting,
    Extracted,
    Rejected,
}

/// Lifecycle of a generation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Empty,
    Unhealthy,
    Healthy,
    Extracted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub accepted_count: usize,
    pub accepted_origins: Vec<String>,
    pub required_count: usize,
    pub health_percent: u8,
    pub healthy: bool,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}% ({}/{} sources)",
            self.health_percent, self.accepted_count, self.required_count
        )?;
        if !self.accepted_origins.is_empty() {
            write!(f, ": {}", self.accepted_origins.join(", "))?;
        }
        Ok(())
    }
}

pub struct EntropyPool {
    engine: sha512::HashEngine,
    accepted_origins: Vec<String>,
    required_sources: usize,
    counter: u32,
    phase: Phase,
}

impl fmt::Debug for EntropyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyPool")
            .field("accepted_origins", &self.accepted_origins)
            .field("required_sources", &self.required_sources)
            .field("state", &self.state())
            .finish()
    }
}

impl Default for EntropyPool {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REQUIRED_SOURCES)
    }
}

impl Drop for EntropyPool {
    fn drop(&mut self) {
        self.engine = sha512::HashEngine::default();
        self.accepted_origins.clear();
        self.counter = 0;
    }
}

impl EntropyPool {
    /// New empty pool. A requirement of `0` is treated as `1`.
    pub fn new(required_sources: usize) -> Self {
        Self {
            engine: sha512::HashEngine::default(),
            accepted_origins: Vec::new(),
            required_sources: required_sources.max(1),
            counter: 0,
            phase: Phase::Collecting,
        }
    }

    /// Fold a sample in. Returns `false` when the origin was already accepted
    /// or the session is over.
    pub fn add(&mut self, sample: SourceSample) -> bool {
        if self.phase != Phase::Collecting {
            log::warn!(
                "Entropy pool is {:?}: ignoring sample from {}",
                self.state(),
                sample.origin()
            );
            return false;
        }

        if self.contains(sample.origin()) {
            log::debug!("Duplicate sample from {} ignored", sample.origin());
            return false;
        }

        self.engine.input(sample.payload());
        self.accepted_origins.push(sample.origin().to_string());
        log::debug!(
            "Accepted {} bytes from {} ({}/{})",
            sample.payload().len(),
            sample.origin(),
            self.accepted_count(),
            self.required_sources
        );
        true
    }

    /// Shorthand for [`EntropyPool::add`]. Empty payloads are ignored.
    pub fn add_bytes<S>(&mut self, origin: S, payload: &[u8]) -> bool
    where
        S: Into<String>,
    {
        match SourceSample::new(origin, payload.to_vec()) {
            Ok(sample) => self.add(sample),
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.accepted_origins.iter().any(|o| o == origin)
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted_origins.len()
    }

    pub fn accepted_origins(&self) -> &[String] {
        &self.accepted_origins
    }

    pub fn required_sources(&self) -> usize {
        self.required_sources
    }

    pub fn is_healthy(&self) -> bool {
        self.accepted_count() >= self.required_sources
    }

    pub fn health_percent(&self) -> u8 {
        let percent: usize = self.accepted_count() * 100 / self.required_sources;
        percent.min(100) as u8
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            accepted_count: self.accepted_count(),
            accepted_origins: self.accepted_origins.clone(),
            required_count: self.required_sources,
            health_percent: self.health_percent(),
            healthy: self.is_healthy(),
        }
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Extracted => SessionState::Extracted,
            Phase::Rejected => SessionState::Rejected,
            Phase::Collecting if self.accepted_origins.is_empty() => SessionState::Empty,
            Phase::Collecting if self.is_healthy() => SessionState::Healthy,
            Phase::Collecting => SessionState::Unhealthy,
        }
    }

    /// Expand the pool into `byte_count` bytes.
    ///
    /// The digest is left untouched; only the block counter moves, so two
    /// identical fresh pools give identical output while consecutive calls on
    /// one pool never repeat a block.
    pub fn extract(&mut self, byte_count: usize) -> Result<SecretBytes, Error> {
        if self.phase == Phase::Rejected || !self.is_healthy() {
            if self.phase == Phase::Collecting {
                self.phase = Phase::Rejected;
            }
            return Err(Error::PoolNotReady {
                accepted: self.accepted_count(),
                required: self.required_sources,
            });
        }
        self.expand(byte_count)
    }

    /// Expand the pool even if it is not healthy.
    ///
    /// Output derived this way has less source diversity than required: the
    /// caller must have obtained an explicit override and must warn the user.
    pub fn extract_unhealthy(&mut self, byte_count: usize) -> Result<SecretBytes, Error> {
        if self.accepted_origins.is_empty() {
            return Err(Error::PoolNotReady {
                accepted: 0,
                required: self.required_sources,
            });
        }
        if !self.is_healthy() {
            log::error!(
                "SEVERE: extracting entropy from an unhealthy pool ({}/{} sources). The result may not be safe to protect funds.",
                self.accepted_count(),
                self.required_sources
            );
        }
        self.expand(byte_count)
    }

    fn expand(&mut self, byte_count: usize) -> Result<SecretBytes, Error> {
        if byte_count == 0 {
            return Err(Error::InvalidRequest(String::from(
                "byte count must be greater than zero",
            )));
        }

        let blocks: usize = byte_count / BLOCK_LEN + usize::from(byte_count % BLOCK_LEN != 0);
        if blocks as u64 > u64::from(u32::MAX - self.counter) {
            return Err(Error::InvalidRequest(format!(
                "{byte_count} bytes exceed the remaining block counter"
            )));
        }

        let base = sha512::Hash::from_engine(self.engine.clone());
        let mut output = SecretBytes::with_capacity(blocks.saturating_mul(BLOCK_LEN));
        while output.len() < byte_count {
            let mut h = sha512::HashEngine::default();
            h.input(base.as_byte_array());
            h.input(&self.counter.to_be_bytes());
            let block = sha512::Hash::from_engine(h);
            output.extend_from_slice(block.as_byte_array());
            self.counter += 1;
        }
        output.truncate(byte_count);

        self.phase = Phase::Extracted;
        Ok(output)
    }
}
