// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

use serde::{Deserialize, Serialize};

/// Result of a single sub-check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub detected: bool,
    /// Indicator that fired, if any
    pub reason: Option<String>,
}

impl DetectionOutcome {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn found(reason: impl Into<String>) -> Self {
        Self {
            detected: true,
            reason: Some(reason.into()),
        }
    }
}
