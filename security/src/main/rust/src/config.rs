// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Reference data for the detectors.
//!
//! Every list has a compiled-in default; a JSON document may override any
//! subset of fields. Once an [`IntegrityConfig`] is handed to a checker it
//! is only ever read.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrityError, Result};

/// Known su binaries and root tool drop locations
const SU_PATHS: &[&str] = &[
    "/system/app/Superuser.apk",
    "/system/bin/su",
    "/system/xbin/su",
    "/system/sd/xbin/su",
    "/system/bin/failsafe/su",
    "/data/local/xbin/su",
    "/data/local/bin/su",
    "/data/local/su",
    "/su/bin/su",
    "/sbin/su",
    "/vendor/bin/su",
    "/system/bin/cufsdosck",
    "/system/xbin/cufsdosck",
    "/system/bin/cufsmgr",
    "/system/xbin/cufsmgr",
    "/system/bin/cufaevdd",
    "/system/xbin/cufaevdd",
    "/system/bin/conbb",
    "/system/xbin/conbb",
];

/// Emulator and virtual machine artifacts
const EMULATOR_FILES: &[&str] = &[
    "/system/bin/androVM-prop",
    "/system/bin/microvirt-prop",
    "/system/lib/libdroid4x.so",
    "/system/bin/windroyed",
    "/system/bin/nox-prop",
    "system/lib/libnoxspeedup.so",
    "/system/bin/ttVM-prop",
    "/data/.bluestacks.prop",
    "/system/bin/duosconfig",
    "/system/etc/xxzs_prop.sh",
    "/system/etc/mumu-configs/device-prop-configs/mumu.config",
    "/system/priv-app/ldAppStore",
    "/system/app/AntStore",
    "vmos.prop",
    "fstab.titan",
    "x8.prop",
];

/// Libraries and packages injected into the process by emulators / VM apps
const EMULATOR_LIBRARIES: &[&str] = &[
    "libhoudini",
    "com.vmos.pro",
    "com.vmos.app",
    "com.vphonegaga.titan",
    "com.f1player",
];

/// Build fingerprint fragments of emulator vendors
const EMULATOR_FINGERPRINTS: &[&str] = &["tencent/vbox64tp/"];

/// Reference signing digest, optionally baked in at build time
const REFERENCE_DIGEST: Option<&str> = option_env!("INTEGRITY_REFERENCE_DIGEST");

/// Maps scan buffer, terminator slot included
pub const DEFAULT_WINDOW_SIZE: usize = 1024;
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 5_000;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Indicator lists consulted by the root and emulator detectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub su_paths: Vec<String>,
    pub emulator_files: Vec<String>,
    pub emulator_libraries: Vec<String>,
    pub emulator_fingerprints: Vec<String>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            su_paths: owned(SU_PATHS),
            emulator_files: owned(EMULATOR_FILES),
            emulator_libraries: owned(EMULATOR_LIBRARIES),
            emulator_fingerprints: owned(EMULATOR_FINGERPRINTS),
        }
    }
}

/// Subprocess settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Shell used as `<shell> -c <command>`
    pub shell: String,
    pub timeout_ms: u64,
}

impl CommandConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        let shell = if cfg!(target_os = "android") {
            "/system/bin/sh"
        } else {
            "/bin/sh"
        };
        Self {
            shell: shell.to_string(),
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Hex digest of the expected signing certificate
    pub reference_digest: String,
    pub indicators: IndicatorConfig,
    pub command: CommandConfig,
    /// Read size used when scanning the process memory map
    pub map_window_size: usize,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            reference_digest: REFERENCE_DIGEST.unwrap_or_default().to_string(),
            indicators: IndicatorConfig::default(),
            command: CommandConfig::default(),
            map_window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl IntegrityConfig {
    /// Parse a JSON override document on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_reference_digest(mut self, digest: impl Into<String>) -> Self {
        self.reference_digest = digest.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.map_window_size < 2 {
            return Err(IntegrityError::Config("map_window_size must be at least 2".to_string()));
        }
        if self.command.timeout_ms == 0 {
            return Err(IntegrityError::Config("command timeout must be non-zero".to_string()));
        }
        if self.command.shell.is_empty() {
            return Err(IntegrityError::Config("command shell must be set".to_string()));
        }
        Ok(())
    }
}
