// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! System property store access.

use std::collections::HashMap;

pub trait PropertyReader: Send + Sync {
    /// Value of `key`, or an empty string when absent or unreadable.
    fn get(&self, key: &str) -> String;
}

/// Reads the Android property store through bionic.
///
/// Hosts without a property store always answer with an empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPropertyReader;

#[cfg(target_os = "android")]
impl PropertyReader for SystemPropertyReader {
    fn get(&self, key: &str) -> String {
        use std::ffi::{CStr, CString};

        let Ok(name) = CString::new(key) else {
            return String::new();
        };
        let mut value = [0 as libc::c_char; libc::PROP_VALUE_MAX as usize];
        // SAFETY: `name` is NUL-terminated and `value` holds PROP_VALUE_MAX bytes,
        // the documented upper bound written by __system_property_get.
        let len = unsafe { libc::__system_property_get(name.as_ptr(), value.as_mut_ptr()) };
        if len <= 0 {
            return String::new();
        }
        // SAFETY: bionic always NUL-terminates within PROP_VALUE_MAX.
        let value = unsafe { CStr::from_ptr(value.as_ptr()) };
        value.to_string_lossy().into_owned()
    }
}

#[cfg(not(target_os = "android"))]
impl PropertyReader for SystemPropertyReader {
    fn get(&self, _key: &str) -> String {
        String::new()
    }
}

/// In-memory property store.
#[derive(Debug, Clone, Default)]
pub struct StaticProperties(HashMap<String, String>);

impl StaticProperties {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl PropertyReader for StaticProperties {
    fn get(&self, key: &str) -> String {
        self.0.get(key).cloned().unwrap_or_default()
    }
}
