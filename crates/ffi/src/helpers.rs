//! Last-error bookkeeping shared by every exported function.
//!
//! Each `tpi_*` call ends in exactly one of these: a failure stores its
//! message and code for `tpi_get_last_error`, a success resets both.

use crate::error::{with_last_error_mut, TpiErrorCode, TpiFfiError};
use std::ffi::CString;

/// Store `error` as this thread's last error and hand back its code, so a
/// failing entry point can `return track_error(..)` directly.
pub(crate) fn track_error(error: &impl TpiFfiError) -> TpiErrorCode {
    let code = error.code();
    tracing::debug!(?code, message = error.msg(), "ffi call failed");
    with_last_error_mut(|(message, last_code)| {
        // A message with an interior NUL is dropped; the code still lands.
        *message = CString::new(error.msg()).ok();
        *last_code = code;
    });
    code
}

/// Reset this thread's last error after a successful call.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|last| *last = (None, TpiErrorCode::Ok));
}

/// `Ok` clears the last error, `Err` records it.
pub(crate) fn track_result<E: TpiFfiError>(result: Result<(), E>) -> TpiErrorCode {
    result.map_or_else(|error| track_error(&error), |()| {
        clear_last_error();
        TpiErrorCode::Ok
    })
}
