// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use std::path::{Path, PathBuf};
use std::time::Duration;

use bip39::Language;
use serde::{Deserialize, Serialize};

use crate::entropy::source;
use crate::types::WordCount;

pub const DEFAULT_REQUIRED_SOURCES: usize = 3;
pub const DEFAULT_SAMPLE_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareDevice {
    pub origin: String,
    pub path: PathBuf,
}

impl HardwareDevice {
    pub fn new<S, P>(origin: S, path: P) -> Self
    where
        S: Into<String>,
        P: AsRef<Path>,
    {
        Self {
            origin: origin.into(),
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Generation settings, passed explicitly to the collector and the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distinct origins needed before extraction is allowed
    pub required_sources: usize,
    pub word_count: WordCount,
    #[serde(with = "language")]
    pub language: Language,
    pub system_sample_len: usize,
    pub secondary_sample_len: usize,
    pub timing_samples: usize,
    pub timing_delay: Duration,
    /// Tried in order, the first readable one is used
    pub hardware_devices: Vec<HardwareDevice>,
    pub hardware_sample_len: usize,
    pub computation_rounds: usize,
    pub system_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_sources: DEFAULT_REQUIRED_SOURCES,
            word_count: WordCount::default(),
            language: Language::English,
            system_sample_len: DEFAULT_SAMPLE_LEN,
            secondary_sample_len: DEFAULT_SAMPLE_LEN,
            timing_samples: 10,
            timing_delay: Duration::from_millis(10),
            hardware_devices: vec![
                HardwareDevice::new(source::HARDWARE_RNG, "/dev/hwrng"),
                HardwareDevice::new(source::KERNEL_RANDOM, "/dev/random"),
            ],
            hardware_sample_len: DEFAULT_SAMPLE_LEN,
            computation_rounds: 64,
            system_events: true,
        }
    }
}

impl Config {
    pub fn from_json<S>(json: S) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        Ok(serde_json::from_str(json.as_ref())?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serialize a wordlist language by its lowercase name
mod language {
    use bip39::Language;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn name(language: &Language) -> String {
        format!("{language:?}").to_lowercase()
    }

    pub fn serialize<S>(language: &Language, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&name(language))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Language, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        let wanted: String = value.replace(['_', '-', ' '], "").to_lowercase();
        Language::all()
            .iter()
            .find(|l| name(l) == wanted)
            .copied()
            .ok_or_else(|| D::Error::custom(format!("unknown mnemonic language: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.required_sources, 3);
        assert_eq!(config.word_count, WordCount::W24);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.hardware_devices.len(), 2);
        assert_eq!(config.hardware_devices[0].path, PathBuf::from("/dev/hwrng"));
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(r#"{"required_sources": 4, "word_count": "W12"}"#).unwrap();
        assert_eq!(config.required_sources, 4);
        assert_eq!(config.word_count, WordCount::W12);
        assert_eq!(config.system_sample_len, DEFAULT_SAMPLE_LEN);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = Config {
            language: Language::Spanish,
            system_events: false,
            ..Default::default()
        };
        let json: String = config.to_json().unwrap();
        assert!(json.contains("\"spanish\""));
        assert_eq!(Config::from_json(json).unwrap(), config);
    }

    #[test]
    fn test_unknown_language() {
        assert!(Config::from_json(r#"{"language": "klingon"}"#).is_err());
    }
}
