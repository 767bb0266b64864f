//! FFI bindings for Vitalis Analytics
//!
//! C-compatible entry points for the presentation layer. All functions take and
//! return null-terminated C strings; returned strings are allocated here and must
//! be freed with `vitalis_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::pipeline::{analytics_from_json, AnalyticsEngine};

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Convert a Rust string to an owned C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => {
            set_last_error("Output contained an interior NUL byte");
            ptr::null_mut()
        }
    }
}

/// Compute analytics for a JSON-encoded input and return the report envelope JSON.
///
/// # Safety
/// - `input_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `vitalis_free_string`.
/// - Returns NULL on error; call `vitalis_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vitalis_compute_analytics(input_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json = match cstr_to_string(input_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid input JSON string pointer");
            return ptr::null_mut();
        }
    };

    match analytics_from_json(json) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Compute analytics with a TOML engine configuration.
///
/// # Safety
/// - `input_json` and `config_toml` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `vitalis_free_string`.
/// - Returns NULL on error; call `vitalis_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vitalis_compute_analytics_with_config(
    input_json: *const c_char,
    config_toml: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json = match cstr_to_string(input_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid input JSON string pointer");
            return ptr::null_mut();
        }
    };

    let toml = match cstr_to_string(config_toml) {
        Some(s) => s,
        None => {
            set_last_error("Invalid config string pointer");
            return ptr::null_mut();
        }
    };

    let config = match EngineConfig::from_toml_str(&toml) {
        Ok(config) => config,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    match AnalyticsEngine::with_config(config).process_json(&json) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a string returned by a `vitalis_*` function.
///
/// # Safety
/// - `ptr` must be a pointer returned by a `vitalis_*` function, or NULL.
/// - The pointer is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn vitalis_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message on this thread.
///
/// # Safety
/// - The returned pointer is valid until the next `vitalis_*` call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if the last call succeeded.
#[no_mangle]
pub unsafe extern "C" fn vitalis_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn vitalis_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> CString {
        CString::new(
            r#"{
                "window": 7,
                "daily_records": [
                    { "date": "2024-03-01", "total_calories": 2000, "total_protein": 120, "hydration_score": 8 },
                    { "date": "2024-03-02", "total_calories": 2200, "total_protein": 100, "hydration_score": 7 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_compute_analytics() {
        let input = sample_input();

        unsafe {
            let result = vitalis_compute_analytics(input.as_ptr());
            assert!(!result.is_null());
            assert!(vitalis_last_error().is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("health_score"));
            assert!(result_str.contains("vitalis-analytics"));

            vitalis_free_string(result);
        }
    }

    #[test]
    fn test_ffi_with_config() {
        let input = sample_input();
        let config = CString::new("[scoring]\ncalorie_floor = 1000.0\n").unwrap();

        unsafe {
            let result = vitalis_compute_analytics_with_config(input.as_ptr(), config.as_ptr());
            assert!(!result.is_null());
            vitalis_free_string(result);

            let bad_config = CString::new("[scoring\n").unwrap();
            let result =
                vitalis_compute_analytics_with_config(input.as_ptr(), bad_config.as_ptr());
            assert!(result.is_null());
            assert!(!vitalis_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let invalid = CString::new("not json").unwrap();

        unsafe {
            let result = vitalis_compute_analytics(invalid.as_ptr());
            assert!(result.is_null());

            let error = vitalis_last_error();
            assert!(!error.is_null());
            assert!(!CStr::from_ptr(error).to_str().unwrap().is_empty());

            // A later success clears the error
            let input = sample_input();
            let result = vitalis_compute_analytics(input.as_ptr());
            assert!(!result.is_null());
            assert!(vitalis_last_error().is_null());
            vitalis_free_string(result);
        }
    }

    #[test]
    fn test_ffi_null_pointer() {
        unsafe {
            assert!(vitalis_compute_analytics(ptr::null()).is_null());
            assert!(!vitalis_last_error().is_null());
            vitalis_free_string(ptr::null_mut());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = CStr::from_ptr(vitalis_version()).to_str().unwrap();
            assert_eq!(version, env!("CARGO_PKG_VERSION"));
        }
    }
}
