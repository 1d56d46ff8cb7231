// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Device integrity checks - Rust Implementation
//!
//! Answers three questions before sensitive operations proceed: is the app
//! signed with the expected certificate, is the device rooted, and is it an
//! emulator. Every verdict is an advisory boolean; probing failures count as
//! "nothing found" and never surface as errors.
//!
//! The host app reaches the engine through `SecurityLib.checkSign`,
//! `SecurityLib.checkRoot` and `SecurityLib.checkEmulator`, registered when
//! the library is loaded (see [`bridge`]).

pub mod bridge;
pub mod checker;
pub mod config;
pub mod emulator;
pub mod error;
pub mod matcher;
pub mod outcome;
pub mod root;
pub mod signals;
pub mod signature;

pub use checker::IntegrityChecker;
pub use config::{CommandConfig, IndicatorConfig, IntegrityConfig};
pub use emulator::{EmulatorDetectionResult, EmulatorDetector};
pub use error::{IntegrityError, Result};
pub use outcome::DetectionOutcome;
pub use root::{RootDetectionResult, RootDetector, RootStage};
pub use signals::Signals;
pub use signature::SignatureVerifier;
