use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::LazyLock;

use tpi_core::{calculate_index, IndexResult, StormPotential, WeatherFactors};

use crate::error::{DefaultTpiError, TpiErrorCode};
use crate::helpers::{clear_last_error, track_error};

/// C-compatible severity factors. Layout matches `WeatherFactors`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TpiFactors {
    pub cape: f64,
    pub shear: f64,
    pub lightning: f64,
    pub updraft: f64,
    pub precip: f64,
}

impl From<TpiFactors> for WeatherFactors {
    fn from(f: TpiFactors) -> Self {
        WeatherFactors::new(f.cape, f.shear, f.lightning, f.updraft, f.precip)
    }
}

impl From<WeatherFactors> for TpiFactors {
    fn from(f: WeatherFactors) -> Self {
        Self {
            cape: f.cape,
            shear: f.shear,
            lightning: f.lightning,
            updraft: f.updraft,
            precip: f.precip,
        }
    }
}

/// Storm potential category, weakest first.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpiPotential {
    WeakToModerate = 0,
    Strong = 1,
    Severe = 2,
    Extreme = 3,
}

impl From<StormPotential> for TpiPotential {
    fn from(potential: StormPotential) -> Self {
        match potential {
            StormPotential::WeakToModerate => TpiPotential::WeakToModerate,
            StormPotential::Strong => TpiPotential::Strong,
            StormPotential::Severe => TpiPotential::Severe,
            StormPotential::Extreme => TpiPotential::Extreme,
        }
    }
}

/// Index value and category. Use `tpi_potential_label` for the text.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TpiResult {
    pub value: f64,
    pub potential: TpiPotential,
}

impl From<IndexResult> for TpiResult {
    fn from(result: IndexResult) -> Self {
        Self {
            value: result.value,
            potential: result.potential.into(),
        }
    }
}

/// C copies of the core interpretation texts, indexed like `StormPotential::ALL`.
static LABELS: LazyLock<[CString; 4]> = LazyLock::new(|| {
    // Interpretation texts never contain interior NULs.
    StormPotential::ALL.map(|p| CString::new(p.interpretation()).unwrap_or_default())
});

/// Compute the Thunderstorm Power Index for `factors`.
///
/// Pure and total: the only failure is a null `out_result`.
///
/// Returns
/// - `TpiErrorCode::Ok` (0) with `out_result` populated
/// - `TpiErrorCode::NullPointer` if `out_result` is null
///
/// # Safety
/// `out_result` must be null or a valid pointer to writable `TpiResult` memory.
#[no_mangle]
pub unsafe extern "C" fn tpi_calculate(
    factors: TpiFactors,
    out_result: *mut TpiResult,
) -> TpiErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultTpiError::null_pointer("out_result"));
    }

    let result = calculate_index(&factors.into());
    // SAFETY: out_result checked non-null above; caller guarantees validity.
    unsafe { ptr::write(out_result, result.into()) };
    clear_last_error();
    TpiErrorCode::Ok
}

/// Static interpretation text for a category (0 = weakest .. 3 = extreme).
///
/// Returns a pointer to a static null-terminated string, or null for an
/// unknown category (the last error is set to `InvalidParameter`).
/// **DO NOT FREE THIS POINTER**.
#[no_mangle]
pub extern "C" fn tpi_potential_label(potential: u32) -> *const c_char {
    let Some(label) = usize::try_from(potential)
        .ok()
        .and_then(|i| LABELS.get(i))
    else {
        track_error(&DefaultTpiError::invalid_parameter(format!(
            "Unknown storm potential {potential}, expected 0-3"
        )));
        return ptr::null();
    };
    clear_last_error();
    label.as_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::tpi_get_last_error_code;
    use std::ffi::CStr;

    #[test]
    fn calculate_writes_result() {
        let mut out = TpiResult {
            value: -1.0,
            potential: TpiPotential::Extreme,
        };
        let factors = TpiFactors::from(WeatherFactors::mock());

        let code = unsafe { tpi_calculate(factors, &mut out) };
        assert_eq!(code, TpiErrorCode::Ok);
        assert_eq!(out.value, 15.0);
        assert_eq!(out.potential, TpiPotential::Strong);
    }

    #[test]
    fn calculate_rejects_null_output() {
        let code = unsafe { tpi_calculate(TpiFactors::default(), ptr::null_mut()) };
        assert_eq!(code, TpiErrorCode::NullPointer);
        assert_eq!(tpi_get_last_error_code(), TpiErrorCode::NullPointer);
    }

    #[test]
    fn labels_match_core_interpretations() {
        for (i, potential) in StormPotential::ALL.into_iter().enumerate() {
            let ptr = tpi_potential_label(u32::try_from(i).unwrap());
            assert!(!ptr.is_null());
            let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap();
            assert_eq!(text, potential.interpretation());
        }
    }

    #[test]
    fn unknown_label_is_null() {
        assert!(tpi_potential_label(4).is_null());
        assert_eq!(tpi_get_last_error_code(), TpiErrorCode::InvalidParameter);
    }
}
