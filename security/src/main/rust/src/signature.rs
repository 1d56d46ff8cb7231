// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Signing certificate digest check.

use log::{debug, error};

use crate::matcher;

/// Compares a candidate digest with the embedded reference digest.
///
/// Only the first `reference.len()` bytes of the candidate take part in the
/// comparison, so a candidate that starts with the reference is accepted.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    reference: String,
}

impl SignatureVerifier {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    pub fn verify(&self, candidate: Option<&str>) -> bool {
        let candidate = match candidate {
            Some(c) if !c.is_empty() => c,
            _ => {
                error!("[checkSign] candidate digest is empty");
                return false;
            }
        };
        if self.reference.is_empty() {
            error!("[checkSign] no reference digest configured");
            return false;
        }

        let matches = matcher::bounded_eq(
            candidate.as_bytes(),
            self.reference.as_bytes(),
            self.reference.len(),
        );
        if matches {
            debug!("[checkSign] signature matches");
        } else {
            error!("[checkSign] signature mismatch");
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const REFERENCE: &str = "3fa90c7d";

    #[rstest]
    #[case(Some("3fa90c7d"), true)]
    #[case(Some("3fa90c7d00ff"), true)]
    #[case(Some("3fa90c7"), false)]
    #[case(Some("3fa90c7e"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn test_verify(#[case] candidate: Option<&str>, #[case] expected: bool) {
        assert_eq!(SignatureVerifier::new(REFERENCE).verify(candidate), expected);
    }

    #[test]
    fn test_empty_reference_fails_closed() {
        assert!(!SignatureVerifier::new("").verify(Some("anything")));
    }
}
