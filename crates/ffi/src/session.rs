use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::sync::Mutex;

use tpi_core::{
    Calculation, CalculatorConfig, CalculatorSession, MockWeatherSource, SelectionBounds, TpiError,
    WeatherFactors,
};

use crate::error::{DefaultTpiError, TpiErrorCode};
use crate::helpers::{clear_last_error, track_error, track_result};
use crate::index::{TpiFactors, TpiResult};

/// C-compatible selection rectangle in decimal degrees.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TpiBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl From<TpiBounds> for SelectionBounds {
    fn from(b: TpiBounds) -> Self {
        SelectionBounds::new(b.south, b.west, b.north, b.east)
    }
}

impl From<SelectionBounds> for TpiBounds {
    fn from(b: SelectionBounds) -> Self {
        Self {
            south: b.south,
            west: b.west,
            north: b.north,
            east: b.east,
        }
    }
}

/// Opaque calculator session handle.
///
/// Holds the selected area and the result text of a plugin control. The
/// session is protected by a `Mutex`, so a host may call in from any thread.
///
/// # Usage
/// ```c
/// TpiSession* session = NULL;
/// if (tpi_session_new(false, &session) != Ok) { /* tpi_get_last_error() */ }
///
/// // "Draw Box" clicked
/// tpi_session_begin_selection(session);
/// // rectangle finished
/// TpiBounds bounds = { -12.6, 130.7, -12.3, 131.1 };
/// tpi_session_complete_selection(session, bounds);
///
/// // "Calculate TPI" clicked
/// TpiResult result;
/// tpi_session_calculate(session, NULL, &result);
/// puts(tpi_session_status_text(session));
///
/// tpi_session_destroy(session);
/// ```
pub struct TpiSession {
    pub(crate) session: Mutex<CalculatorSession<MockWeatherSource>>,
    /// Last rendered status text, kept alive for `tpi_session_status_text`.
    pub(crate) status_text: Mutex<CString>,
}

impl TpiSession {
    pub(crate) fn new(config: &CalculatorConfig) -> Self {
        Self {
            session: Mutex::new(CalculatorSession::from_config(config)),
            status_text: Mutex::new(CString::default()),
        }
    }

    fn with_session<F, T>(&self, f: F) -> Result<T, DefaultTpiError>
    where
        F: FnOnce(&mut CalculatorSession<MockWeatherSource>) -> T,
    {
        let mut session = self
            .session
            .lock()
            .map_err(|_| DefaultTpiError::lock_poisoned("Mutex"))?;
        Ok(f(&mut session))
    }
}

fn session_from_ptr<'a>(ptr: *const TpiSession) -> Result<&'a TpiSession, DefaultTpiError> {
    // SAFETY: callers pass a pointer obtained from tpi_session_new or null.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultTpiError::null_pointer("session"))
}

unsafe fn publish_session(session: TpiSession, out_session: *mut *mut TpiSession) {
    // SAFETY: out_session checked non-null by the caller.
    unsafe { *out_session = Box::into_raw(Box::new(session)) };
}

/// Create a session backed by the mock data source.
///
/// `show_factors` appends the raw factor summary to successful result text.
///
/// Returns
/// - `TpiErrorCode::Ok` with `*out_session` set
/// - `TpiErrorCode::NullPointer` if `out_session` is null
///
/// # Safety
/// `out_session` must be null or valid for writes. Release the session with
/// `tpi_session_destroy`.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_new(
    show_factors: bool,
    out_session: *mut *mut TpiSession,
) -> TpiErrorCode {
    if out_session.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_session"));
    }

    let config = CalculatorConfig {
        show_factors,
        ..CalculatorConfig::default()
    };
    unsafe { publish_session(TpiSession::new(&config), out_session) };
    clear_last_error();
    TpiErrorCode::Ok
}

/// Create a session from a JSON calculator config.
///
/// Returns
/// - `TpiErrorCode::Ok` with `*out_session` set
/// - `TpiErrorCode::NullPointer` if `config_json` or `out_session` is null
/// - `TpiErrorCode::InvalidParameter` if the JSON is not UTF-8 or not a valid config
///
/// # Safety
/// `config_json` must be null or a valid null-terminated string. `out_session`
/// must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_new_from_json(
    config_json: *const c_char,
    out_session: *mut *mut TpiSession,
) -> TpiErrorCode {
    if config_json.is_null() {
        return track_error(&DefaultTpiError::null_pointer("config_json"));
    }
    if out_session.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_session"));
    }

    // SAFETY: config_json checked non-null; caller guarantees termination.
    let json = match unsafe { CStr::from_ptr(config_json) }.to_str() {
        Ok(json) => json,
        Err(e) => {
            return track_error(&DefaultTpiError::invalid_parameter(format!(
                "config_json is not valid UTF-8: {e}"
            )));
        }
    };

    match CalculatorConfig::from_json_str(json) {
        Ok(config) => {
            unsafe { publish_session(TpiSession::new(&config), out_session) };
            clear_last_error();
            TpiErrorCode::Ok
        }
        Err(e) => track_error(&DefaultTpiError::from(e)),
    }
}

/// Destroy a session created by `tpi_session_new` / `tpi_session_new_from_json`.
///
/// # Safety
/// `ptr` must be null or a pointer returned by a session constructor that has
/// not been destroyed yet. Null is a no-op.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_destroy(ptr: *mut TpiSession) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: ptr came from Box::into_raw in tpi_session_new*, so reclaiming
    // it here runs the destructor exactly once.
    drop(unsafe { Box::from_raw(ptr) });
}

/// "Draw Box": start a new selection, discarding the previous one.
#[no_mangle]
pub extern "C" fn tpi_session_begin_selection(ptr: *const TpiSession) -> TpiErrorCode {
    track_result(
        session_from_ptr(ptr).and_then(|s| s.with_session(CalculatorSession::begin_selection)),
    )
}

/// Rectangle finished drawing.
#[no_mangle]
pub extern "C" fn tpi_session_complete_selection(
    ptr: *const TpiSession,
    bounds: TpiBounds,
) -> TpiErrorCode {
    track_result(
        session_from_ptr(ptr)
            .and_then(|s| s.with_session(|session| session.complete_selection(bounds.into()))),
    )
}

/// Whether "Calculate TPI" should be enabled. False for a null session.
#[no_mangle]
pub extern "C" fn tpi_session_can_calculate(ptr: *const TpiSession) -> bool {
    session_from_ptr(ptr)
        .and_then(|s| s.with_session(|session| session.can_calculate()))
        .unwrap_or(false)
}

unsafe fn write_outputs(
    calc: &Calculation,
    out_factors: *mut TpiFactors,
    out_result: *mut TpiResult,
) {
    // SAFETY: out_result checked non-null by the caller; out_factors is optional.
    unsafe {
        if !out_factors.is_null() {
            ptr::write(out_factors, calc.factors.into());
        }
        ptr::write(out_result, calc.result.into());
    }
}

fn calculation_error(err: TpiError) -> TpiErrorCode {
    track_error(&DefaultTpiError::from(err))
}

/// "Calculate TPI" with the session's mock data source.
///
/// Returns
/// - `TpiErrorCode::Ok` with `out_result` (and `out_factors` if non-null) populated
/// - `TpiErrorCode::NullPointer` if `ptr` or `out_result` is null
/// - `TpiErrorCode::NoSelection` if no area is selected
/// - `TpiErrorCode::DataUnavailable` if the data source failed
///
/// # Safety
/// `ptr` must be null or a live session. `out_factors` and `out_result` must be
/// null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_calculate(
    ptr: *const TpiSession,
    out_factors: *mut TpiFactors,
    out_result: *mut TpiResult,
) -> TpiErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_result"));
    }
    let outcome =
        match session_from_ptr(ptr).and_then(|s| s.with_session(CalculatorSession::calculate)) {
            Ok(outcome) => outcome,
            Err(e) => return track_error(&e),
        };

    match outcome {
        Ok(calc) => {
            unsafe { write_outputs(&calc, out_factors, out_result) };
            clear_last_error();
            TpiErrorCode::Ok
        }
        Err(err) => calculation_error(err),
    }
}

/// First half of "Calculate TPI" for hosts that fetch factors themselves.
///
/// Checks the selection and switches the status to `Calculating...`. On
/// success `*out_bounds` holds the area to fetch factors for; pass the same
/// bounds to `tpi_session_finish_calculation`.
///
/// Returns
/// - `TpiErrorCode::Ok` with `out_bounds` populated
/// - `TpiErrorCode::NullPointer` if `ptr` or `out_bounds` is null
/// - `TpiErrorCode::NoSelection` if no area is selected
///
/// # Safety
/// `ptr` must be null or a live session. `out_bounds` must be null or valid
/// for writes.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_start_calculation(
    ptr: *const TpiSession,
    out_bounds: *mut TpiBounds,
) -> TpiErrorCode {
    if out_bounds.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_bounds"));
    }
    let outcome = match session_from_ptr(ptr)
        .and_then(|s| s.with_session(CalculatorSession::start_calculation))
    {
        Ok(outcome) => outcome,
        Err(e) => return track_error(&e),
    };

    match outcome {
        Ok(bounds) => {
            // SAFETY: out_bounds checked non-null above.
            unsafe { ptr::write(out_bounds, bounds.into()) };
            clear_last_error();
            TpiErrorCode::Ok
        }
        Err(err) => calculation_error(err),
    }
}

/// Second half of "Calculate TPI": hand over the factors fetched for `bounds`.
///
/// Pass null `factors` when the host's data fetch failed; the session then
/// shows the error text and `DataUnavailable` is returned. Bounds that do not
/// match a pending `tpi_session_start_calculation` (for example because a new
/// selection was started meanwhile) are rejected with `NoSelection` and the
/// status is left as it was.
///
/// Returns
/// - `TpiErrorCode::Ok` with `out_result` populated
/// - `TpiErrorCode::NullPointer` if `ptr` or `out_result` is null
/// - `TpiErrorCode::NoSelection` if no calculation is pending for `bounds`
/// - `TpiErrorCode::DataUnavailable` if `factors` is null
///
/// # Safety
/// `ptr` must be null or a live session. `factors` must be null or point to a
/// valid `TpiFactors`. `out_result` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn tpi_session_finish_calculation(
    ptr: *const TpiSession,
    bounds: TpiBounds,
    factors: *const TpiFactors,
    out_result: *mut TpiResult,
) -> TpiErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_result"));
    }

    // SAFETY: factors is either null or valid per the contract above.
    let fetched: Result<WeatherFactors, TpiError> = match unsafe { factors.as_ref() } {
        Some(f) => Ok((*f).into()),
        None => Err(TpiError::DataUnavailable(
            "host did not supply weather factors".to_string(),
        )),
    };

    let outcome = match session_from_ptr(ptr).and_then(|s| {
        s.with_session(|session| session.finish_calculation(bounds.into(), fetched))
    }) {
        Ok(outcome) => outcome,
        Err(e) => return track_error(&e),
    };

    match outcome {
        Ok(calc) => {
            unsafe { write_outputs(&calc, ptr::null_mut(), out_result) };
            clear_last_error();
            TpiErrorCode::Ok
        }
        Err(err) => calculation_error(err),
    }
}

/// Current result-area text as a null-terminated string.
///
/// The pointer stays valid until the next call to this function on the same
/// session or until the session is destroyed. **DO NOT FREE THIS POINTER**.
/// Returns null if `ptr` is null or the session lock is poisoned.
#[no_mangle]
pub extern "C" fn tpi_session_status_text(ptr: *const TpiSession) -> *const c_char {
    let result = session_from_ptr(ptr).and_then(|s| {
        let text = s.with_session(|session| session.status_text())?;
        // Interior NULs cannot occur in status text.
        let text = CString::new(text).unwrap_or_default();
        let mut cached = s
            .status_text
            .lock()
            .map_err(|_| DefaultTpiError::lock_poisoned("Mutex"))?;
        *cached = text;
        Ok(cached.as_ptr())
    });

    match result {
        Ok(text) => {
            clear_last_error();
            text
        }
        Err(e) => {
            track_error(&e);
            ptr::null()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{tpi_get_last_error, tpi_get_last_error_code};
    use crate::index::TpiPotential;

    fn new_session(show_factors: bool) -> *mut TpiSession {
        let mut session: *mut TpiSession = ptr::null_mut();
        let code = unsafe { tpi_session_new(show_factors, &mut session) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert!(!session.is_null());
        session
    }

    fn status_text(session: *const TpiSession) -> String {
        let text = tpi_session_status_text(session);
        assert!(!text.is_null());
        unsafe { CStr::from_ptr(text) }.to_str().unwrap().to_string()
    }

    fn last_error_message() -> String {
        let message = tpi_get_last_error();
        assert!(!message.is_null());
        unsafe { CStr::from_ptr(message) }.to_str().unwrap().to_string()
    }

    fn empty_result() -> TpiResult {
        TpiResult {
            value: 0.0,
            potential: TpiPotential::WeakToModerate,
        }
    }

    #[test]
    fn full_flow_through_c_api() {
        let session = new_session(true);
        assert!(!tpi_session_can_calculate(session));

        assert_eq!(tpi_session_begin_selection(session), TpiErrorCode::Ok);
        let bounds = TpiBounds {
            south: -12.6,
            west: 130.7,
            north: -12.3,
            east: 131.1,
        };
        assert_eq!(tpi_session_complete_selection(session, bounds), TpiErrorCode::Ok);
        assert!(tpi_session_can_calculate(session));

        let mut factors = TpiFactors::default();
        let mut result = empty_result();
        let code = unsafe { tpi_session_calculate(session, &mut factors, &mut result) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert_eq!(factors.cape, 3.0);
        assert_eq!(result.value, 15.0);
        assert_eq!(result.potential, TpiPotential::Strong);
        assert!(status_text(session).ends_with("Precip: 3)"));

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn calculate_without_selection_sets_last_error() {
        let session = new_session(false);
        let mut result = empty_result();

        let code = unsafe { tpi_session_calculate(session, ptr::null_mut(), &mut result) };
        assert_eq!(code, TpiErrorCode::NoSelection);
        assert_eq!(tpi_get_last_error_code(), TpiErrorCode::NoSelection);
        assert_eq!(status_text(session), "Please select an area first.");

        unsafe { tpi_session_destroy(session) };
    }

    fn perth() -> TpiBounds {
        TpiBounds {
            south: -32.2,
            west: 115.6,
            north: -31.7,
            east: 116.1,
        }
    }

    #[test]
    fn host_fetch_failure_reports_data_unavailable() {
        let session = new_session(false);
        tpi_session_complete_selection(session, perth());
        let mut bounds = TpiBounds::default();
        let mut result = empty_result();

        let code = unsafe { tpi_session_start_calculation(session, &mut bounds) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert_eq!(bounds, perth());
        assert_eq!(status_text(session), "Calculating...");

        let code =
            unsafe { tpi_session_finish_calculation(session, bounds, ptr::null(), &mut result) };
        assert_eq!(code, TpiErrorCode::DataUnavailable);
        assert_eq!(status_text(session), "Error calculating TPI. Please try again.");

        let supplied = TpiFactors {
            cape: 5.0,
            shear: 5.0,
            lightning: 5.0,
            updraft: 5.0,
            precip: 5.0,
        };
        unsafe { tpi_session_start_calculation(session, &mut bounds) };
        let code = unsafe { tpi_session_finish_calculation(session, bounds, &supplied, &mut result) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert_eq!(result.potential, TpiPotential::Extreme);

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn start_without_selection_skips_host_fetch() {
        let session = new_session(false);
        let mut bounds = perth();

        let code = unsafe { tpi_session_start_calculation(session, &mut bounds) };
        assert_eq!(code, TpiErrorCode::NoSelection);
        assert_eq!(bounds, perth(), "bounds must not be written on failure");
        assert_eq!(status_text(session), "Please select an area first.");

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn finish_after_new_selection_started_is_rejected() {
        let session = new_session(false);
        tpi_session_complete_selection(session, perth());
        let mut bounds = TpiBounds::default();
        unsafe { tpi_session_start_calculation(session, &mut bounds) };

        tpi_session_begin_selection(session);
        let supplied = TpiFactors::from(WeatherFactors::mock());
        let mut result = empty_result();
        let code = unsafe { tpi_session_finish_calculation(session, bounds, &supplied, &mut result) };
        assert_eq!(code, TpiErrorCode::NoSelection);
        assert_eq!(result, empty_result());
        assert_eq!(status_text(session), "");

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn start_and_finish_reject_null_outputs() {
        let session = new_session(false);
        tpi_session_complete_selection(session, perth());

        let code = unsafe { tpi_session_start_calculation(session, ptr::null_mut()) };
        assert_eq!(code, TpiErrorCode::NullPointer);
        assert_eq!(last_error_message(), "Parameter 'out_bounds' cannot be null");

        let code = unsafe {
            tpi_session_finish_calculation(session, perth(), ptr::null(), ptr::null_mut())
        };
        assert_eq!(code, TpiErrorCode::NullPointer);
        assert_eq!(last_error_message(), "Parameter 'out_result' cannot be null");

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn calculate_rejects_null_session() {
        let mut result = empty_result();
        let code = unsafe { tpi_session_calculate(ptr::null(), ptr::null_mut(), &mut result) };
        assert_eq!(code, TpiErrorCode::NullPointer);
        assert_eq!(tpi_get_last_error_code(), TpiErrorCode::NullPointer);
        assert_eq!(last_error_message(), "Parameter 'session' cannot be null");
        assert_eq!(result, empty_result());
    }

    #[test]
    fn calculate_rejects_null_result_before_touching_session() {
        let session = new_session(false);
        tpi_session_complete_selection(session, perth());

        let code = unsafe { tpi_session_calculate(session, ptr::null_mut(), ptr::null_mut()) };
        assert_eq!(code, TpiErrorCode::NullPointer);
        assert_eq!(last_error_message(), "Parameter 'out_result' cannot be null");
        assert_eq!(status_text(session), "", "no calculation may have run");

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn no_selection_message_is_readable_from_c() {
        let session = new_session(false);
        let mut result = empty_result();

        unsafe { tpi_session_calculate(session, ptr::null_mut(), &mut result) };
        assert_eq!(last_error_message(), "no area selected");

        tpi_session_complete_selection(session, perth());
        let code = unsafe { tpi_session_calculate(session, ptr::null_mut(), &mut result) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert!(tpi_get_last_error().is_null());

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn json_config_is_validated() {
        let mut session: *mut TpiSession = ptr::null_mut();
        let code = unsafe { tpi_session_new_from_json(c"{ broken".as_ptr(), &mut session) };
        assert_eq!(code, TpiErrorCode::InvalidParameter);
        assert!(session.is_null());

        let json = cr#"{ "mock_factors": { "cape": 1, "shear": 1, "lightning": 1, "updraft": 1, "precip": 1 } }"#;
        let code = unsafe { tpi_session_new_from_json(json.as_ptr(), &mut session) };
        assert_eq!(code, TpiErrorCode::Ok);

        tpi_session_complete_selection(session, TpiBounds::default());
        let mut result = empty_result();
        unsafe { tpi_session_calculate(session, ptr::null_mut(), &mut result) };
        assert_eq!(result.value, 5.0);

        unsafe { tpi_session_destroy(session) };
    }

    #[test]
    fn null_session_is_rejected() {
        assert_eq!(
            tpi_session_begin_selection(ptr::null()),
            TpiErrorCode::NullPointer
        );
        assert!(!tpi_session_can_calculate(ptr::null()));
        assert!(tpi_session_status_text(ptr::null()).is_null());
        unsafe { tpi_session_destroy(ptr::null_mut()) };
    }
}
