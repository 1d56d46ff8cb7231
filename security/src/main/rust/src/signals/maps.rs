// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Scanning of the process memory-map listing.
//!
//! The listing is read in fixed-size windows and every window is searched
//! on its own. A window of `n` bytes carries at most `n - 1` bytes of
//! listing; the last slot stays a NUL terminator. Nothing is carried over between windows, so an indicator
//! that straddles a window boundary is not seen by that scan.

use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};

use log::debug;

use crate::config::DEFAULT_WINDOW_SIZE;
use crate::error::Result;
use crate::matcher;
use crate::outcome::DetectionOutcome;

/// Something that can hand out a fresh reader over a maps listing.
pub trait MapSource: Send + Sync {
    fn open(&self) -> Result<Box<dyn Read + Send>>;
}

/// `/proc/<pid>/maps` of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfMaps;

impl MapSource for SelfMaps {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        let path = format!("/proc/{}/maps", std::process::id());
        Ok(Box::new(File::open(path)?))
    }
}

/// Fixed listing, served from memory.
#[derive(Debug, Clone, Default)]
pub struct StaticMaps(Vec<u8>);

impl StaticMaps {
    pub fn new(listing: impl Into<Vec<u8>>) -> Self {
        Self(listing.into())
    }
}

impl MapSource for StaticMaps {
    fn open(&self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(self.0.clone())))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ProcessMapScanner {
    window_size: usize,
}

impl Default for ProcessMapScanner {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ProcessMapScanner {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(2),
        }
    }

    /// Open `source` and scan it. Failure to open counts as "not found".
    pub fn scan(&self, source: &dyn MapSource, indicators: &[String]) -> DetectionOutcome {
        match source.open() {
            Ok(reader) => self.scan_reader(reader, indicators),
            Err(e) => {
                debug!("[checkEmulator] open maps fail: {}", e);
                DetectionOutcome::clear()
            }
        }
    }

    pub fn scan_self_maps(&self, indicators: &[String]) -> DetectionOutcome {
        self.scan(&SelfMaps, indicators)
    }

    /// Read windows until EOF, a read error or the first match.
    pub fn scan_reader<R: Read>(&self, mut reader: R, indicators: &[String]) -> DetectionOutcome {
        let mut window = vec![0u8; self.window_size];
        let payload = self.window_size - 1;

        loop {
            let len = match reader.read(&mut window[..payload]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("[checkEmulator] maps read stopped: {}", e);
                    break;
                }
            };

            let chunk = &window[..len];
            if let Some(hit) = indicators
                .iter()
                .find(|indicator| matcher::contains(chunk, indicator.as_bytes()))
            {
                debug!("[checkEmulator] find emulator lib reason: {}", hit);
                return DetectionOutcome::found(hit.as_str());
            }
        }

        DetectionOutcome::clear()
    }
}
