// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Signal sources consulted by the detectors.
//!
//! Each source is a trait so the OS probes can be swapped for in-memory
//! fixtures. Every implementation must be infallible from the caller's
//! point of view: an unreadable source yields "nothing found".

pub mod command;
pub mod maps;
pub mod path;
pub mod property;

pub use command::{CommandOutput, CommandResult, CommandRunner, ScriptedCommands, ShellCommandRunner};
pub use maps::{MapSource, ProcessMapScanner, SelfMaps, StaticMaps};
pub use path::{FsPathProbe, PathProbe, StaticPaths, Traversal};
pub use property::{PropertyReader, StaticProperties, SystemPropertyReader};

use crate::config::CommandConfig;

/// The four probes a checker needs.
pub struct Signals {
    pub paths: Box<dyn PathProbe>,
    pub properties: Box<dyn PropertyReader>,
    pub commands: Box<dyn CommandRunner>,
    pub maps: Box<dyn MapSource>,
}

impl Signals {
    /// Real filesystem, property store, shell and `/proc/<pid>/maps`.
    pub fn system(command: &CommandConfig) -> Self {
        Self {
            paths: Box::new(FsPathProbe),
            properties: Box::new(SystemPropertyReader),
            commands: Box::new(ShellCommandRunner::from_config(command)),
            maps: Box::new(SelfMaps),
        }
    }
}

impl std::fmt::Debug for Signals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signals").finish_non_exhaustive()
    }
}
