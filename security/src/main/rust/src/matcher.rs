// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Byte-level string matching over raw buffers.
//!
//! Both helpers treat a NUL byte and the end of the slice as the same
//! terminator, so they behave identically on NUL-terminated windows and on
//! plain Rust slices.

#[inline]
fn byte_at(buf: &[u8], index: usize) -> u8 {
    buf.get(index).copied().unwrap_or(0)
}

/// Compare at most `n` bytes of `a` and `b`.
///
/// Stops at the first differing byte or at the first terminator shared by
/// both sides. Returns `true` when no difference was found in that span.
pub fn bounded_eq(a: &[u8], b: &[u8], n: usize) -> bool {
    for i in 0..n {
        let (ca, cb) = (byte_at(a, i), byte_at(b, i));
        if ca != cb {
            return false;
        }
        if ca == 0 {
            return true;
        }
    }
    true
}

/// Position of the first occurrence of `needle` in `haystack`.
///
/// The haystack ends at its first NUL byte. An empty needle matches at 0.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let needle_len = needle.iter().position(|&b| b == 0).unwrap_or(needle.len());
    if needle_len == 0 {
        return Some(0);
    }

    let mut start = 0;
    while byte_at(haystack, start) != 0 {
        let mut offset = 0;
        while offset < needle_len && byte_at(haystack, start + offset) == needle[offset] {
            offset += 1;
        }
        if offset == needle_len {
            return Some(start);
        }
        start += 1;
    }
    None
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}

/// `str` convenience over [`contains`].
pub fn str_contains(haystack: &str, needle: &str) -> bool {
    contains(haystack.as_bytes(), needle.as_bytes())
}

/// `true` when `value` begins with `prefix`, compared over `prefix.len()` bytes.
pub fn starts_with_bounded(value: &str, prefix: &str) -> bool {
    bounded_eq(value.as_bytes(), prefix.as_bytes(), prefix.len())
}
