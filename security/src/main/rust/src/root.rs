// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Root detection.
//!
//! Five checks run in a fixed order and the pipeline stops at the first one
//! that finds evidence:
//!
//! 1. known su / root tool binaries on disk
//! 2. `which su` resolving to something
//! 3. `ro.build.tags` carrying `dev-keys` or `test-keys`
//! 4. `ro.secure` set to `0`
//! 5. `magisk --list` reporting an `su` applet

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::matcher;
use crate::outcome::DetectionOutcome;
use crate::signals::path::{any_exists, Traversal};
use crate::signals::Signals;

const TAG: &str = "checkRoot";
const WHICH_SU: &str = "which su";
const MAGISK_LIST: &str = "magisk --list";
const PROP_BUILD_TAGS: &str = "ro.build.tags";
const PROP_SECURE: &str = "ro.secure";
const UNSAFE_TAGS: &[&str] = &["dev-keys", "test-keys"];

/// Pipeline stage that produced a root verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootStage {
    SuBinary,
    WhichSu,
    BuildTags,
    SecureFlag,
    Magisk,
}

/// Root detection result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootDetectionResult {
    pub is_rooted: bool,
    pub stage: Option<RootStage>,
    pub reason: Option<String>,
}

type Check<'a> = fn(&RootDetector<'a>) -> DetectionOutcome;

pub struct RootDetector<'a> {
    indicators: &'a IndicatorConfig,
    signals: &'a Signals,
}

impl<'a> RootDetector<'a> {
    pub fn new(indicators: &'a IndicatorConfig, signals: &'a Signals) -> Self {
        Self { indicators, signals }
    }

    /// Run the pipeline, stopping at the first stage that fires.
    pub fn detect(&self) -> RootDetectionResult {
        debug!("[{}] check start", TAG);

        let stages: [(RootStage, Check<'a>); 5] = [
            (RootStage::SuBinary, Self::check_su_binaries),
            (RootStage::WhichSu, Self::check_which_su),
            (RootStage::BuildTags, Self::check_build_tags),
            (RootStage::SecureFlag, Self::check_secure_flag),
            (RootStage::Magisk, Self::check_magisk),
        ];

        for (stage, check) in stages {
            let outcome = check(self);
            if outcome.detected {
                debug!("[{}] check end, rooted at {:?}", TAG, stage);
                return RootDetectionResult {
                    is_rooted: true,
                    stage: Some(stage),
                    reason: outcome.reason,
                };
            }
        }

        debug!("[{}] check end", TAG);
        RootDetectionResult {
            is_rooted: false,
            stage: None,
            reason: None,
        }
    }

    fn check_su_binaries(&self) -> DetectionOutcome {
        any_exists(
            self.signals.paths.as_ref(),
            &self.indicators.su_paths,
            Traversal::FirstHit,
            TAG,
        )
    }

    fn check_which_su(&self) -> DetectionOutcome {
        let output = self.signals.commands.run(WHICH_SU).into_output();
        match output.line(0) {
            Some(first) if !matcher::str_contains(first, "not found") => {
                error!("[{}] find su cmd: {}", TAG, first);
                DetectionOutcome::found(first)
            }
            Some(_) => DetectionOutcome::clear(),
            None => {
                debug!("[{}] which su cmd result is null", TAG);
                DetectionOutcome::clear()
            }
        }
    }

    fn check_build_tags(&self) -> DetectionOutcome {
        let tags = self.signals.properties.get(PROP_BUILD_TAGS);
        if tags.is_empty() {
            return DetectionOutcome::clear();
        }
        debug!("[{}] tags: {}", TAG, tags);
        match UNSAFE_TAGS.iter().find(|t| matcher::str_contains(&tags, t)) {
            Some(tag) => {
                error!("[{}] build signed with {}", TAG, tag);
                DetectionOutcome::found(format!("{}={}", PROP_BUILD_TAGS, tags))
            }
            None => DetectionOutcome::clear(),
        }
    }

    fn check_secure_flag(&self) -> DetectionOutcome {
        let secure = self.signals.properties.get(PROP_SECURE);
        if secure.is_empty() {
            return DetectionOutcome::clear();
        }
        debug!("[{}] secure: {}", TAG, secure);
        if matcher::bounded_eq(secure.as_bytes(), b"0", 1) {
            error!("[{}] ro.secure disabled", TAG);
            DetectionOutcome::found(format!("{}={}", PROP_SECURE, secure))
        } else {
            DetectionOutcome::clear()
        }
    }

    fn check_magisk(&self) -> DetectionOutcome {
        let output = self.signals.commands.run(MAGISK_LIST).into_output();
        let hit = output.lines().find(|line| matcher::starts_with_bounded(line, "su"));
        match hit {
            Some(line) => {
                error!("[{}] find magisk su", TAG);
                DetectionOutcome::found(format!("magisk applet {}", line))
            }
            None => DetectionOutcome::clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{ScriptedCommands, StaticMaps, StaticPaths, StaticProperties};
    use rstest::rstest;

    fn signals(paths: &[&str], props: &[(&str, &str)], commands: ScriptedCommands) -> Signals {
        Signals {
            paths: Box::new(StaticPaths::new(paths.iter().copied())),
            properties: Box::new(StaticProperties::new(props.iter().copied())),
            commands: Box::new(commands),
            maps: Box::new(StaticMaps::default()),
        }
    }

    fn clean_commands() -> ScriptedCommands {
        ScriptedCommands::new()
            .with_output(WHICH_SU, ["su not found"])
            .with_output(MAGISK_LIST, Vec::<String>::new())
    }

    const CLEAN_PROPS: &[(&str, &str)] = &[("ro.build.tags", "release-keys"), ("ro.secure", "1")];

    #[test_log::test]
    fn test_clean_device() {
        let indicators = IndicatorConfig::default();
        let signals = signals(&[], CLEAN_PROPS, clean_commands());
        let result = RootDetector::new(&indicators, &signals).detect();
        assert!(!result.is_rooted);
        assert_eq!(result.stage, None);
    }

    #[test]
    fn test_su_binary_short_circuits() {
        let indicators = IndicatorConfig::default();
        // A scripted `which su` hit would report WhichSu if the pipeline kept going
        let commands = ScriptedCommands::new().with_output(WHICH_SU, ["/system/xbin/su"]);
        let signals = signals(&["/sbin/su"], CLEAN_PROPS, commands);
        let result = RootDetector::new(&indicators, &signals).detect();
        assert!(result.is_rooted);
        assert_eq!(result.stage, Some(RootStage::SuBinary));
        assert_eq!(result.reason.as_deref(), Some("/sbin/su"));
    }

    #[rstest]
    #[case(&["/system/xbin/su"], Some(RootStage::WhichSu))]
    #[case(&["which: no su in (/usr/bin)", "/bin/su"], Some(RootStage::WhichSu))]
    #[case(&["su not found"], None)]
    #[case(&[], None)]
    fn test_which_su(#[case] lines: &[&str], #[case] expected: Option<RootStage>) {
        let indicators = IndicatorConfig::default();
        let commands = clean_commands().with_output(WHICH_SU, lines.iter().copied());
        let signals = signals(&[], CLEAN_PROPS, commands);
        assert_eq!(RootDetector::new(&indicators, &signals).detect().stage, expected);
    }

    #[rstest]
    #[case("test-keys", Some(RootStage::BuildTags))]
    #[case("release-keys,dev-keys", Some(RootStage::BuildTags))]
    #[case("release-keys", None)]
    #[case("", None)]
    fn test_build_tags(#[case] tags: &str, #[case] expected: Option<RootStage>) {
        let indicators = IndicatorConfig::default();
        let signals = signals(&[], &[("ro.build.tags", tags), ("ro.secure", "1")], clean_commands());
        assert_eq!(RootDetector::new(&indicators, &signals).detect().stage, expected);
    }

    #[rstest]
    #[case("0", Some(RootStage::SecureFlag))]
    #[case("0x", Some(RootStage::SecureFlag))]
    #[case("1", None)]
    #[case("", None)]
    fn test_secure_flag(#[case] secure: &str, #[case] expected: Option<RootStage>) {
        let indicators = IndicatorConfig::default();
        let signals = signals(&[], &[("ro.build.tags", "release-keys"), ("ro.secure", secure)], clean_commands());
        assert_eq!(RootDetector::new(&indicators, &signals).detect().stage, expected);
    }

    #[test]
    fn test_magisk_su_applet() {
        let indicators = IndicatorConfig::default();
        let commands = clean_commands().with_output(MAGISK_LIST, ["magiskpolicy", "resetprop", "su"]);
        let signals = signals(&[], CLEAN_PROPS, commands);
        let result = RootDetector::new(&indicators, &signals).detect();
        assert_eq!(result.stage, Some(RootStage::Magisk));
    }

    #[test]
    fn test_missing_commands_are_no_signal() {
        let indicators = IndicatorConfig::default();
        let signals = signals(&[], CLEAN_PROPS, ScriptedCommands::new());
        assert!(!RootDetector::new(&indicators, &signals).detect().is_rooted);
    }
}
