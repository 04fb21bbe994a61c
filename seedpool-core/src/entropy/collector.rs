// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::pool::{self, EntropyPool, PoolStatus};
use super::source::{self, SourceSample};
use crate::config::Config;
use crate::types::SecretBytes;

type UserPrompt = Box<dyn FnMut() -> Option<String>>;

/// A source that could not contribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub origin: String,
    pub reason: String,
    /// The platform CSPRNG is missing: output should not be trusted
    pub severe: bool,
}

/// Collects samples from every available source into one [`EntropyPool`]
pub struct EntropyCollector {
    config: Config,
    pool: EntropyPool,
    failures: Vec<SourceFailure>,
    user_prompt: Option<UserPrompt>,
}

impl fmt::Debug for EntropyCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropyCollector")
            .field("pool", &self.pool)
            .field("failures", &self.failures)
            .finish()
    }
}

impl Default for EntropyCollector {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl EntropyCollector {
    pub fn new(config: Config) -> Self {
        Self {
            pool: EntropyPool::new(config.required_sources),
            config,
            failures: Vec::new(),
            user_prompt: None,
        }
    }

    /// Callback asked for user entropy when [`EntropyCollector::collect_user_entropy`]
    /// gets no input. Prompting is up to the caller.
    pub fn with_user_prompt<F>(mut self, prompt: F) -> Self
    where
        F: FnMut() -> Option<String> + 'static,
    {
        self.user_prompt = Some(Box::new(prompt));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &EntropyPool {
        &self.pool
    }

    pub fn into_pool(self) -> EntropyPool {
        self.pool
    }

    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    pub fn is_healthy(&self) -> bool {
        self.pool.is_healthy()
    }

    /// Sources that could not contribute, at most one record per origin
    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    /// `true` if the platform CSPRNG could not be read
    pub fn has_severe_failure(&self) -> bool {
        self.failures.iter().any(|f| f.severe)
    }

    fn accept(&mut self, result: Result<SourceSample, source::Error>, origin: &str) -> bool {
        match result {
            Ok(sample) => {
                let origin: String = sample.origin().to_string();
                let accepted: bool = self.pool.add(sample);
                if accepted {
                    log::info!("Collected entropy from {origin}");
                }
                accepted
            }
            Err(e) => {
                let severe: bool = origin == source::SYSTEM_CSPRNG;
                if severe {
                    log::error!("SEVERE: platform CSPRNG unavailable, generated secrets may be weak: {e}");
                } else {
                    log::warn!("Skipping {origin}: {e}");
                }
                let failure = SourceFailure {
                    origin: origin.to_string(),
                    reason: e.to_string(),
                    severe,
                };
                // One record per origin, the latest reason wins
                match self.failures.iter_mut().find(|f| f.origin == origin) {
                    Some(existing) => *existing = failure,
                    None => self.failures.push(failure),
                }
                false
            }
        }
    }

    pub fn collect_system_entropy(&mut self) -> bool {
        let sample = source::system_csprng(self.config.system_sample_len);
        self.accept(sample, source::SYSTEM_CSPRNG)
    }

    pub fn collect_secondary_csprng_entropy(&mut self) -> bool {
        let sample = source::secure_rng(self.config.secondary_sample_len);
        self.accept(sample, source::SECURE_RNG)
    }

    /// Weak supplementary source
    pub fn collect_timing_entropy(&mut self) -> bool {
        let sample = source::timing(&self.config);
        self.accept(sample, source::TIMING)
    }

    pub fn collect_hardware_entropy(&mut self) -> bool {
        let sample = source::hardware(&self.config);
        self.accept(sample, source::HARDWARE_RNG)
    }

    /// Weak supplementary source, never to be relied on alone
    pub fn collect_computation_entropy(&mut self) -> bool {
        let sample = source::computation(self.config.computation_rounds);
        self.accept(sample, source::COMPUTATION)
    }

    pub fn collect_system_events(&mut self) -> bool {
        if !self.config.system_events {
            return false;
        }
        let sample = source::system_events();
        self.accept(sample, source::SYSTEM_EVENTS)
    }

    /// Hash user supplied text into the pool. With no input the prompt
    /// callback is asked, if any. Empty input is skipped silently.
    pub fn collect_user_entropy(&mut self, input: Option<&str>) -> bool {
        let input: Option<Zeroizing<String>> = match input {
            Some(input) => Some(Zeroizing::new(input.to_string())),
            None => self
                .user_prompt
                .as_mut()
                .and_then(|prompt| prompt())
                .map(Zeroizing::new),
        };

        match input.as_deref().and_then(source::user_input) {
            Some(sample) => self.accept(Ok(sample), source::USER_INPUT),
            None => {
                log::debug!("No user entropy provided");
                false
            }
        }
    }

    /// Run every collector in a fixed order. Individual failures are
    /// tolerated; check [`EntropyCollector::is_healthy`] afterwards.
    pub fn collect_all(&mut self, include_user: bool) {
        log::info!("Entropy pool: {}", self.pool.status());

        self.collect_system_entropy();
        self.collect_secondary_csprng_entropy();
        self.collect_timing_entropy();
        self.collect_hardware_entropy();
        self.collect_computation_entropy();
        self.collect_system_events();
        if include_user {
            self.collect_user_entropy(None);
        }

        log::info!("Entropy pool: {}", self.pool.status());
    }

    /// Extract `byte_count` bytes, collecting one more round first if the
    /// pool is not healthy yet.
    pub fn get_entropy(&mut self, byte_count: usize) -> Result<SecretBytes, pool::Error> {
        self.ensure_healthy();
        self.pool.extract(byte_count)
    }

    /// Like [`EntropyCollector::get_entropy`] but proceeds on an unhealthy
    /// pool. Only for an explicit user override: the UI must show a severe
    /// warning.
    pub fn get_entropy_unhealthy(&mut self, byte_count: usize) -> Result<SecretBytes, pool::Error> {
        self.ensure_healthy();
        self.pool.extract_unhealthy(byte_count)
    }

    fn ensure_healthy(&mut self) {
        if !self.pool.is_healthy() {
            log::warn!(
                "Entropy pool not healthy ({}), collecting more entropy",
                self.pool.status()
            );
            self.collect_all(true);
        }
    }
}
