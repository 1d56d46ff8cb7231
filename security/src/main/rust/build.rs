// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

// Build script for the integrity engine
// Links liblog on Android and tracks the baked-in reference digest

fn main() {
    // Build scripts run on the host, so ask cargo for the target OS
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("android") {
        println!("cargo:rustc-link-lib=log");
    }

    println!("cargo:rerun-if-env-changed=INTEGRITY_REFERENCE_DIGEST");
}
