// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Entropy sources
//!
//! Every function here performs one acquisition and returns a [`SourceSample`]
//! ready to be folded into an [`EntropyPool`](super::EntropyPool). None of them
//! touch a pool directly.

use std::fs::File;
use std::io::Read;
use std::thread;
use std::time::Instant;

use bitcoin::hashes::{sha256, Hash, HashEngine};
use bitcoin::secp256k1::Secp256k1;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use zeroize::Zeroizing;

use crate::config::{Config, HardwareDevice};
use crate::crypto::hash;
use crate::util::time;

pub const SYSTEM_CSPRNG: &str = "system-csprng";
pub const SECURE_RNG: &str = "secure-rng";
pub const TIMING: &str = "timing";
pub const HARDWARE_RNG: &str = "hardware-rng";
pub const KERNEL_RANDOM: &str = "kernel-random";
pub const COMPUTATION: &str = "computation";
pub const SYSTEM_EVENTS: &str = "system-events";
pub const USER_INPUT: &str = "user-input";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{origin} unavailable: {reason}")]
    Unavailable { origin: String, reason: String },
    #[error("{0} produced an empty sample")]
    EmptyPayload(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl Error {
    fn unavailable<O, R>(origin: O, reason: R) -> Self
    where
        O: Into<String>,
        R: ToString,
    {
        Self::Unavailable {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

/// One contribution of raw bytes from one named origin
pub struct SourceSample {
    origin: String,
    payload: Zeroizing<Vec<u8>>,
}

impl core::fmt::Debug for SourceSample {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceSample")
            .field("origin", &self.origin)
            .field("len", &self.payload.len())
            .finish()
    }
}

impl SourceSample {
    pub fn new<S>(origin: S, payload: Vec<u8>) -> Result<Self, Error>
    where
        S: Into<String>,
    {
        let origin: String = origin.into();
        let payload = Zeroizing::new(payload);
        if payload.is_empty() {
            return Err(Error::EmptyPayload(origin));
        }
        Ok(Self { origin, payload })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Platform CSPRNG (`getrandom` under the hood)
pub fn system_csprng(len: usize) -> Result<SourceSample, Error> {
    let mut buf = Zeroizing::new(vec![0u8; len]);
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::unavailable(SYSTEM_CSPRNG, e))?;
    SourceSample::new(SYSTEM_CSPRNG, buf.to_vec())
}

/// ChaCha20 stream, an implementation independent from the OS one.
pub fn secure_rng(len: usize) -> Result<SourceSample, Error> {
    let mut chacha = match ChaCha20Rng::from_rng(OsRng) {
        Ok(rng) => rng,
        Err(e) => {
            log::debug!("ChaCha20 seeding from OsRng failed ({e}), falling back to from_entropy");
            ChaCha20Rng::from_entropy()
        }
    };
    let mut buf = Zeroizing::new(vec![0u8; len]);
    chacha
        .try_fill_bytes(&mut buf)
        .map_err(|e| Error::unavailable(SECURE_RNG, e))?;
    SourceSample::new(SECURE_RNG, buf.to_vec())
}

/// Clock jitter. Weak: only useful to raise diversity.
pub fn timing(config: &Config) -> Result<SourceSample, Error> {
    let start = Instant::now();
    let mut h = sha256::HashEngine::default();
    for i in 0..config.timing_samples {
        h.input(&start.elapsed().as_nanos().to_be_bytes());
        h.input(&time::timestamp_nanos().to_be_bytes());
        if i + 1 < config.timing_samples {
            thread::sleep(config.timing_delay);
        }
    }
    let digest = sha256::Hash::from_engine(h);
    SourceSample::new(TIMING, digest.to_byte_array().to_vec())
}

/// First readable device wins
pub fn hardware(config: &Config) -> Result<SourceSample, Error> {
    for device in config.hardware_devices.iter() {
        match read_device(device, config.hardware_sample_len) {
            Ok(sample) => return Ok(sample),
            Err(e) => log::debug!("{}: {e}", device.path.display()),
        }
    }
    Err(Error::unavailable(
        HARDWARE_RNG,
        "no hardware or kernel entropy device found",
    ))
}

fn read_device(device: &HardwareDevice, len: usize) -> Result<SourceSample, Error> {
    let mut file = File::open(&device.path)?;
    let mut buf = Zeroizing::new(vec![0u8; len]);
    file.read_exact(&mut buf)?;
    SourceSample::new(device.origin.clone(), buf.to_vec())
}

/// Key generation work, hashed together with transient process state.
///
/// Weak and partially redundant with the CSPRNG: the key pairs come from the
/// thread RNG and the addresses depend on the allocator. It only adds
/// diversity and a collection-time delay.
pub fn computation(rounds: usize) -> Result<SourceSample, Error> {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();
    let start = Instant::now();
    let mut h = sha256::HashEngine::default();
    for _ in 0..rounds.max(1) {
        let (secret_key, public_key) = secp.generate_keypair(&mut rng);
        let address: usize = &secret_key as *const _ as usize;
        h.input(&address.to_be_bytes());
        h.input(&secret_key.secret_bytes());
        h.input(&public_key.serialize());
        h.input(&start.elapsed().as_nanos().to_be_bytes());
    }
    let digest = sha256::Hash::from_engine(h);
    SourceSample::new(COMPUTATION, digest.to_byte_array().to_vec())
}

/// Dynamic and static host events
#[cfg(all(feature = "sysinfo", not(target_vendor = "apple")))]
pub fn system_events() -> Result<SourceSample, Error> {
    use sysinfo::{System, SystemExt};

    if !System::IS_SUPPORTED {
        return Err(Error::unavailable(SYSTEM_EVENTS, "platform not supported"));
    }

    let system_info: System = System::new_all();
    let mut h = sha256::HashEngine::default();

    // Dynamic events
    h.input(&system_info.boot_time().to_be_bytes());
    h.input(&system_info.total_memory().to_be_bytes());
    h.input(&system_info.free_memory().to_be_bytes());
    h.input(&system_info.total_swap().to_be_bytes());
    h.input(&system_info.free_swap().to_be_bytes());
    h.input(format!("{:?}", system_info.processes()).as_bytes());
    h.input(format!("{:?}", system_info.load_average()).as_bytes());

    // Static events
    h.input(system_info.host_name().unwrap_or_default().as_bytes());
    h.input(system_info.long_os_version().unwrap_or_default().as_bytes());
    h.input(system_info.kernel_version().unwrap_or_default().as_bytes());
    h.input(format!("{:?}", system_info.global_cpu_info()).as_bytes());
    h.input(format!("{:?}", system_info.users()).as_bytes());

    let digest = sha256::Hash::from_engine(h);
    SourceSample::new(SYSTEM_EVENTS, digest.to_byte_array().to_vec())
}

#[cfg(not(all(feature = "sysinfo", not(target_vendor = "apple"))))]
pub fn system_events() -> Result<SourceSample, Error> {
    Err(Error::unavailable(SYSTEM_EVENTS, "built without sysinfo"))
}

/// Arbitrary text typed by the user. `None` for empty input.
pub fn user_input<S>(input: S) -> Option<SourceSample>
where
    S: AsRef<str>,
{
    let input: &str = input.as_ref();
    if input.is_empty() {
        return None;
    }
    let digest = hash::sha256(input);
    SourceSample::new(USER_INPUT, digest.to_byte_array().to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_empty_payload() {
        assert!(matches!(
            SourceSample::new("x", Vec::new()),
            Err(Error::EmptyPayload(origin)) if origin == "x"
        ));
    }

    #[test]
    fn test_csprng_sources() {
        let a = system_csprng(64).unwrap();
        let b = system_csprng(64).unwrap();
        assert_eq!(a.origin(), SYSTEM_CSPRNG);
        assert_eq!(a.payload().len(), 64);
        assert_ne!(a.payload(), b.payload());

        let c = secure_rng(32).unwrap();
        assert_eq!(c.origin(), SECURE_RNG);
        assert_eq!(c.payload().len(), 32);
    }

    #[test]
    fn test_timing() {
        let config = Config {
            timing_samples: 3,
            timing_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let sample = timing(&config).unwrap();
        assert_eq!(sample.origin(), TIMING);
        assert_eq!(sample.payload().len(), 32);
    }

    #[test]
    fn test_hardware_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[7u8; 80]).unwrap();

        let config = Config {
            hardware_devices: vec![
                HardwareDevice::new(HARDWARE_RNG, "/nonexistent/hwrng"),
                HardwareDevice::new(KERNEL_RANDOM, file.path()),
            ],
            hardware_sample_len: 64,
            ..Default::default()
        };
        let sample = hardware(&config).unwrap();
        assert_eq!(sample.origin(), KERNEL_RANDOM);
        assert_eq!(sample.payload(), &[7u8; 64][..]);
    }

    #[test]
    fn test_hardware_short_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1u8; 10]).unwrap();

        let config = Config {
            hardware_devices: vec![HardwareDevice::new(HARDWARE_RNG, file.path())],
            hardware_sample_len: 64,
            ..Default::default()
        };
        assert!(matches!(
            hardware(&config),
            Err(Error::Unavailable { .. })
        ));
    }

    #[test]
    fn test_no_hardware_device() {
        let config = Config {
            hardware_devices: vec![HardwareDevice::new(
                HARDWARE_RNG,
                PathBuf::from("/nonexistent/hwrng"),
            )],
            ..Default::default()
        };
        assert!(hardware(&config).is_err());
    }

    #[test]
    fn test_computation() {
        let sample = computation(2).unwrap();
        assert_eq!(sample.origin(), COMPUTATION);
        assert_eq!(sample.payload().len(), 32);
    }

    #[test]
    fn test_user_input() {
        assert!(user_input("").is_none());
        let a = user_input("correct horse").unwrap();
        let b = user_input("correct horse").unwrap();
        assert_eq!(a.origin(), USER_INPUT);
        assert_eq!(a.payload(), b.payload());
        assert_eq!(
            a.payload(),
            &sha256::Hash::hash(b"correct horse").to_byte_array()[..]
        );
    }
}
