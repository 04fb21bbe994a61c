// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Host capability check

use core::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemReport {
    pub os: String,
    pub kernel: Option<String>,
    pub csprng_available: bool,
    pub hardware_rng_available: bool,
    /// `true` when the host can be inspected for the system-events source
    pub system_events_supported: bool,
}

impl SystemReport {
    pub fn probe(config: &Config) -> Self {
        let mut buf = [0u8; 16];
        let csprng_available: bool = OsRng.try_fill_bytes(&mut buf).is_ok();

        let hardware_rng_available: bool = config
            .hardware_devices
            .iter()
            .any(|device| device.path.exists());

        let report = Self {
            os: std::env::consts::OS.to_string(),
            kernel: kernel_version(),
            csprng_available,
            hardware_rng_available,
            system_events_supported: system_events_supported(),
        };

        log::debug!("{report:?}");
        report
    }

    /// Severe first, then advisory
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = Vec::new();
        if !self.csprng_available {
            warnings.push(String::from(
                "SEVERE: the platform CSPRNG is unavailable, do not use generated secrets",
            ));
        }
        if !self.hardware_rng_available {
            warnings.push(String::from(
                "No hardware or kernel entropy device found: relying on software sources",
            ));
        }
        if !self.system_events_supported {
            warnings.push(String::from("System events unavailable on this host"));
        }
        warnings
    }

    pub fn is_severe(&self) -> bool {
        !self.csprng_available
    }
}

impl fmt::Display for SystemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OS: {}", self.os)?;
        if let Some(kernel) = &self.kernel {
            writeln!(f, "Kernel: {kernel}")?;
        }
        writeln!(f, "Secure random source: {}", yes_no(self.csprng_available))?;
        write!(
            f,
            "Hardware random source: {}",
            yes_no(self.hardware_rng_available)
        )
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(all(feature = "sysinfo", not(target_vendor = "apple")))]
fn kernel_version() -> Option<String> {
    use sysinfo::{System, SystemExt};

    if System::IS_SUPPORTED {
        System::new().kernel_version()
    } else {
        None
    }
}

#[cfg(not(all(feature = "sysinfo", not(target_vendor = "apple"))))]
fn kernel_version() -> Option<String> {
    None
}

#[cfg(all(feature = "sysinfo", not(target_vendor = "apple")))]
fn system_events_supported() -> bool {
    use sysinfo::{System, SystemExt};
    System::IS_SUPPORTED
}

#[cfg(not(all(feature = "sysinfo", not(target_vendor = "apple"))))]
fn system_events_supported() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HardwareDevice;

    #[test]
    fn test_probe() {
        let dir = tempfile::tempdir().unwrap();
        let device = dir.path().join("hwrng");
        std::fs::write(&device, [0u8; 8]).unwrap();

        let config = Config {
            hardware_devices: vec![
                HardwareDevice::new("hardware-rng", dir.path().join("missing")),
                HardwareDevice::new("hardware-rng", &device),
            ],
            ..Default::default()
        };
        let report = SystemReport::probe(&config);
        assert!(report.csprng_available);
        assert!(report.hardware_rng_available);
        assert!(!report.is_severe());
        assert_eq!(report.os, std::env::consts::OS);
        assert!(report
            .warnings()
            .iter()
            .all(|w| !w.starts_with("SEVERE")));
    }

    #[test]
    fn test_no_hardware_device() {
        let config = Config {
            hardware_devices: vec![HardwareDevice::new("hardware-rng", "/nonexistent/hwrng")],
            ..Default::default()
        };
        let report = SystemReport::probe(&config);
        assert!(!report.hardware_rng_available);
        assert!(report
            .warnings()
            .iter()
            .any(|w| w.contains("No hardware")));
    }

    #[test]
    fn test_severe_warning_first() {
        let report = SystemReport {
            os: String::from("test"),
            kernel: None,
            csprng_available: false,
            hardware_rng_available: false,
            system_events_supported: true,
        };
        let warnings = report.warnings();
        assert!(report.is_severe());
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("SEVERE"));
        assert!(report.to_string().contains("Secure random source: no"));
    }
}
