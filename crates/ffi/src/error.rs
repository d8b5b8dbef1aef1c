use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use tpi_core::TpiError;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
///
/// # Example
/// ```rust,ignore
/// let err = DefaultTpiError::null_pointer("out_result");
/// assert_eq!(err.code(), TpiErrorCode::NullPointer);
/// assert_eq!(err.msg(), "Parameter 'out_result' cannot be null");
/// ```
pub(crate) trait TpiFfiError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> TpiErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `TpiFfiError` for the FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultTpiError {
    code: TpiErrorCode,
    msg: String,
}

impl DefaultTpiError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_session"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: TpiErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"Mutex"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: TpiErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: TpiErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl TpiFfiError for DefaultTpiError {
    fn code(&self) -> TpiErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<TpiError> for DefaultTpiError {
    fn from(error: TpiError) -> Self {
        let code = match error {
            TpiError::NoSelection => TpiErrorCode::NoSelection,
            TpiError::DataUnavailable(_) => TpiErrorCode::DataUnavailable,
            TpiError::Config(_) => TpiErrorCode::InvalidParameter,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

/// FFI error codes returned by TPI functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpiErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Calculate was requested before an area was selected.
    NoSelection = 3,

    /// The weather data source could not provide factors.
    DataUnavailable = 4,

    /// Invalid parameter passed to function.
    InvalidParameter = 5,
}

impl From<DefaultTpiError> for TpiErrorCode {
    fn from(error: DefaultTpiError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, TpiErrorCode)> = const { RefCell::new((None, TpiErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, TpiErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, TpiErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last operation succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```c
/// TpiResult result;
/// if (tpi_session_calculate(session, NULL, &result) != Ok) {
///     const char* error = tpi_get_last_error();
///     if (error) {
///         printf("TPI calculation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn tpi_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
///
/// Error state is per-thread, like `tpi_get_last_error`.
#[no_mangle]
pub extern "C" fn tpi_get_last_error_code() -> TpiErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
