// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Emulator / virtual machine detection.
//!
//! Three signal groups are always evaluated, and the device counts as an
//! emulator when any of them fires. This is a heuristic union meant for
//! advisory warnings, not an attestation.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::matcher;
use crate::outcome::DetectionOutcome;
use crate::signals::path::{any_exists, Traversal};
use crate::signals::{ProcessMapScanner, Signals};

const TAG: &str = "checkEmulator";
const PROP_CHARACTERISTICS: &str = "ro.build.characteristics";
const PROP_FINGERPRINT: &str = "ro.product.build.fingerprint";
const PROP_PLATFORM: &str = "ro.board.platform";

/// Emulator detection result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorDetectionResult {
    pub is_emulator: bool,
    pub feature_files: DetectionOutcome,
    pub build_properties: DetectionOutcome,
    pub injected_libraries: DetectionOutcome,
}

pub struct EmulatorDetector<'a> {
    indicators: &'a IndicatorConfig,
    signals: &'a Signals,
    scanner: ProcessMapScanner,
}

impl<'a> EmulatorDetector<'a> {
    pub fn new(indicators: &'a IndicatorConfig, signals: &'a Signals, scanner: ProcessMapScanner) -> Self {
        Self {
            indicators,
            signals,
            scanner,
        }
    }

    pub fn detect(&self) -> EmulatorDetectionResult {
        let feature_files = self.check_feature_files();
        let build_properties = self.check_build_properties();
        let injected_libraries = self.check_injected_libraries();

        EmulatorDetectionResult {
            is_emulator: feature_files.detected
                || build_properties.detected
                || injected_libraries.detected,
            feature_files,
            build_properties,
            injected_libraries,
        }
    }

    fn check_feature_files(&self) -> DetectionOutcome {
        debug!("[{}] feature file check start", TAG);
        any_exists(
            self.signals.paths.as_ref(),
            &self.indicators.emulator_files,
            Traversal::Exhaustive,
            TAG,
        )
    }

    /// Characteristics, then vendor fingerprint, then board platform; the
    /// first property that matches ends the group.
    fn check_build_properties(&self) -> DetectionOutcome {
        debug!("[{}] build info check start", TAG);
        let props = &self.signals.properties;

        let characteristics = props.get(PROP_CHARACTERISTICS);
        if !characteristics.is_empty() {
            debug!("[{}] characteristics: {}", TAG, characteristics);
            if matcher::str_contains(&characteristics, "emulator") {
                return DetectionOutcome::found(format!("{}={}", PROP_CHARACTERISTICS, characteristics));
            }
        }

        let fingerprint = props.get(PROP_FINGERPRINT);
        if !fingerprint.is_empty() {
            debug!("[{}] fingerprint: {}", TAG, fingerprint);
            let vendor = self
                .indicators
                .emulator_fingerprints
                .iter()
                .any(|fragment| matcher::str_contains(&fingerprint, fragment));
            if vendor {
                return DetectionOutcome::found(format!("{}={}", PROP_FINGERPRINT, fingerprint));
            }
        }

        let platform = props.get(PROP_PLATFORM);
        if !platform.is_empty() {
            debug!("[{}] platform: {}", TAG, platform);
            if matcher::str_contains(&platform, "windows") {
                return DetectionOutcome::found(format!("{}={}", PROP_PLATFORM, platform));
            }
        }

        DetectionOutcome::clear()
    }

    fn check_injected_libraries(&self) -> DetectionOutcome {
        debug!("[{}] injected library check start", TAG);
        self.scanner
            .scan(self.signals.maps.as_ref(), &self.indicators.emulator_libraries)
    }
}
