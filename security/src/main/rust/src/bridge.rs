// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! JNI bindings.
//!
//! The three entry points are registered on `SecurityLib` from
//! `JNI_OnLoad` through a fixed method table, so no `Java_*` symbol lookup
//! is involved.

use std::ffi::c_void;

use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jint, JNI_ERR, JNI_FALSE, JNI_TRUE, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM, NativeMethod};
use log::{error, info};
use once_cell::sync::Lazy;

#[cfg(target_os = "android")]
use android_logger::Config;
#[cfg(target_os = "android")]
use log::LevelFilter;

use crate::checker::IntegrityChecker;
use crate::error::Result;

const SECURITY_LIB_CLASS: &str = "com/difft/android/security/SecurityLib";

static CHECKER: Lazy<IntegrityChecker> = Lazy::new(IntegrityChecker::system);

fn as_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

/// `boolean checkSign(String digest)`
extern "system" fn check_sign(mut env: JNIEnv, _class: JClass, candidate: JString) -> jboolean {
    if candidate.is_null() {
        return JNI_FALSE;
    }
    let candidate: String = match env.get_string(&candidate) {
        Ok(s) => s.into(),
        Err(e) => {
            error!("[checkSign] failed to read candidate: {}", e);
            return JNI_FALSE;
        }
    };
    as_jboolean(CHECKER.check_sign(Some(&candidate)))
}

/// `boolean checkRoot()`
extern "system" fn check_root(_env: JNIEnv, _class: JClass) -> jboolean {
    as_jboolean(CHECKER.check_root())
}

/// `boolean checkEmulator()`
extern "system" fn check_emulator(_env: JNIEnv, _class: JClass) -> jboolean {
    as_jboolean(CHECKER.check_emulator())
}

fn binding_table() -> [NativeMethod; 3] {
    [
        NativeMethod {
            name: "checkSign".into(),
            sig: "(Ljava/lang/String;)Z".into(),
            fn_ptr: check_sign as *mut c_void,
        },
        NativeMethod {
            name: "checkRoot".into(),
            sig: "()Z".into(),
            fn_ptr: check_root as *mut c_void,
        },
        NativeMethod {
            name: "checkEmulator".into(),
            sig: "()Z".into(),
            fn_ptr: check_emulator as *mut c_void,
        },
    ]
}

fn register(env: &mut JNIEnv) -> Result<()> {
    env.register_native_methods(SECURITY_LIB_CLASS, &binding_table())?;
    Ok(())
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Info)
            .with_tag("SecurityLib"),
    );
}

#[cfg(not(target_os = "android"))]
fn init_logging() {
    // No-op for non-Android platforms
}

/// Library load hook: install the logger and register the natives.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn JNI_OnLoad(vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    init_logging();

    // SAFETY: the VM pointer is handed to us by the JVM for the lifetime of the library.
    let vm = match unsafe { JavaVM::from_raw(vm) } {
        Ok(vm) => vm,
        Err(e) => {
            error!("[SecurityLib] invalid JavaVM: {}", e);
            return JNI_ERR;
        }
    };
    let mut env = match vm.get_env() {
        Ok(env) => env,
        Err(e) => {
            error!("[SecurityLib] no JNIEnv on load: {}", e);
            return JNI_ERR;
        }
    };

    match register(&mut env) {
        Ok(()) => {
            info!("[SecurityLib] registered {} natives", binding_table().len());
            JNI_VERSION_1_6
        }
        Err(e) => {
            error!("[SecurityLib] register natives failed: {}", e);
            JNI_ERR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_table_is_complete() {
        let table = binding_table();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|m| !m.fn_ptr.is_null()));
    }

    #[test]
    fn test_as_jboolean() {
        assert_eq!(as_jboolean(true), JNI_TRUE);
        assert_eq!(as_jboolean(false), JNI_FALSE);
    }
}
