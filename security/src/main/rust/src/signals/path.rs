// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Filesystem existence probing.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, error};

use crate::outcome::DetectionOutcome;

pub trait PathProbe: Send + Sync {
    fn exists(&self, path: &str) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPathProbe;

impl PathProbe for FsPathProbe {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

/// Fixed set of paths that "exist".
#[derive(Debug, Clone, Default)]
pub struct StaticPaths(HashSet<String>);

impl StaticPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl PathProbe for StaticPaths {
    fn exists(&self, path: &str) -> bool {
        self.0.contains(path)
    }
}

/// Whether a scan stops at the first hit or keeps going for the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    FirstHit,
    Exhaustive,
}

/// OR of `exists` over `list`. The reason is always the first hit.
pub fn any_exists(
    probe: &dyn PathProbe,
    list: &[String],
    traversal: Traversal,
    tag: &str,
) -> DetectionOutcome {
    let mut outcome = DetectionOutcome::clear();

    for path in list {
        if !probe.exists(path) {
            continue;
        }
        error!("[{}] found indicator file: {}", tag, path);
        if !outcome.detected {
            outcome = DetectionOutcome::found(path.as_str());
        }
        if traversal == Traversal::FirstHit {
            break;
        }
    }

    if !outcome.detected {
        debug!("[{}] no indicator file among {} paths", tag, list.len());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        inner: StaticPaths,
        calls: AtomicUsize,
    }

    impl PathProbe for Counting {
        fn exists(&self, path: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.exists(path)
        }
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_exists() {
        assert!(!FsPathProbe.exists("/nonexistent/path"));
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("su");
        std::fs::write(&file, b"").unwrap();
        assert!(FsPathProbe.exists(file.to_str().unwrap()));
    }

    #[test]
    fn test_first_hit_stops_early() {
        let probe = Counting {
            inner: StaticPaths::new(["/b"]),
            calls: AtomicUsize::new(0),
        };
        let outcome = any_exists(&probe, &list(&["/a", "/b", "/c"]), Traversal::FirstHit, "test");
        assert!(outcome.detected);
        assert_eq!(outcome.reason.as_deref(), Some("/b"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_exhaustive_probes_everything_but_keeps_first_reason() {
        let probe = Counting {
            inner: StaticPaths::new(["/b", "/c"]),
            calls: AtomicUsize::new(0),
        };
        let outcome = any_exists(&probe, &list(&["/a", "/b", "/c"]), Traversal::Exhaustive, "test");
        assert!(outcome.detected);
        assert_eq!(outcome.reason.as_deref(), Some("/b"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_empty_list_is_clear() {
        let outcome = any_exists(&FsPathProbe, &[], Traversal::FirstHit, "test");
        assert_eq!(outcome, DetectionOutcome::clear());
    }
}
