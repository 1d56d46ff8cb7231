// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Internal error type.
//!
//! Nothing here crosses the JNI boundary: detectors turn every error into
//! a negative outcome, the bridge turns it into `false` or `JNI_ERR`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed configuration document: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("jni error: {0}")]
    Jni(#[from] jni::errors::Error),
}

pub type Result<T> = std::result::Result<T, IntegrityError>;
