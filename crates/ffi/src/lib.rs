//! C ABI for the Thunderstorm Power Index calculator.
//!
//! Lets a host (map plugin runtime, native shell, game engine) compute the
//! index and drive a calculator session without linking Rust. The C header
//! `ThunderstormIndexFFI.h` is generated by `build.rs`.
//!
//! Conventions:
//! - Fallible functions return [`TpiErrorCode`]; `Ok` is 0.
//! - On failure the message is available from [`tpi_get_last_error`] until
//!   the next call on the same thread.
//! - Output parameters are checked for null before anything else happens.

mod error;
mod helpers;
mod index;
mod session;

pub use error::{tpi_get_last_error, tpi_get_last_error_code, TpiErrorCode};
pub use index::{tpi_calculate, tpi_potential_label, TpiFactors, TpiPotential, TpiResult};
pub use session::{
    tpi_session_begin_selection, tpi_session_calculate, tpi_session_can_calculate,
    tpi_session_complete_selection, tpi_session_destroy, tpi_session_finish_calculation,
    tpi_session_new, tpi_session_new_from_json, tpi_session_start_calculation,
    tpi_session_status_text, TpiBounds, TpiSession,
};
