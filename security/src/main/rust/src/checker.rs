// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Facade answering the three trust questions.
//!
//! Detectors speak in the positive sense (`is_rooted`, `is_emulator`).
//! The facade flips them: every `check_*` returns `true` when the
//! environment looks trustworthy.

use crate::config::IntegrityConfig;
use crate::emulator::{EmulatorDetectionResult, EmulatorDetector};
use crate::root::{RootDetectionResult, RootDetector};
use crate::signals::{ProcessMapScanner, Signals};
use crate::signature::SignatureVerifier;

#[derive(Debug)]
pub struct IntegrityChecker {
    config: IntegrityConfig,
    signals: Signals,
    verifier: SignatureVerifier,
}

impl IntegrityChecker {
    pub fn new(config: IntegrityConfig, signals: Signals) -> Self {
        let verifier = SignatureVerifier::new(config.reference_digest.clone());
        Self {
            config,
            signals,
            verifier,
        }
    }

    /// Default configuration wired to the real OS probes.
    pub fn system() -> Self {
        Self::with_system_signals(IntegrityConfig::default())
    }

    pub fn with_system_signals(config: IntegrityConfig) -> Self {
        let signals = Signals::system(&config.command);
        Self::new(config, signals)
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// `true` when the candidate digest starts with the reference digest.
    pub fn check_sign(&self, candidate: Option<&str>) -> bool {
        self.verifier.verify(candidate)
    }

    /// `true` when no root indicator was found.
    pub fn check_root(&self) -> bool {
        !self.detect_root().is_rooted
    }

    /// `true` when the device looks genuine (no emulator indicator).
    pub fn check_emulator(&self) -> bool {
        !self.detect_emulator().is_emulator
    }

    pub fn is_not_rooted(&self) -> bool {
        self.check_root()
    }

    pub fn is_genuine_device(&self) -> bool {
        self.check_emulator()
    }

    pub fn detect_root(&self) -> RootDetectionResult {
        RootDetector::new(&self.config.indicators, &self.signals).detect()
    }

    pub fn detect_emulator(&self) -> EmulatorDetectionResult {
        let scanner = ProcessMapScanner::new(self.config.map_window_size);
        EmulatorDetector::new(&self.config.indicators, &self.signals, scanner).detect()
    }
}
