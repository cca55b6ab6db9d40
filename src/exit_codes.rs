//! Exit code standardization for hygienectl
//!
//! ## Exit Code Convention
//!
//! - `0` = Success (every item tagged, skipped, or advised)
//! - `1` = Run failure (enumeration unreachable, or items failed)
//! - `2` = Configuration or usage error

use crate::error::HygieneError;

/// Standard exit codes for hygienectl
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// Unrecoverable lookup failure or failed items in the batch
    pub const RUN_FAILURE: i32 = 1;
    /// Configuration or argument error
    pub const CONFIG_ERROR: i32 = 2;
}

/// Map a HygieneError to an exit code
pub fn exit_code_for_error(error: &HygieneError) -> i32 {
    use HygieneError::*;
    match error {
        Config(_) | Validation { .. } => codes::CONFIG_ERROR,
        ResourceNotFound { .. } | InsufficientData { .. } | Provider { .. } | Io(_) | Json(_) => {
            codes::RUN_FAILURE
        }
    }
}

/// Map an error surfaced through anyhow at the CLI boundary
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<HygieneError>() {
        Some(e) => exit_code_for_error(e),
        None => codes::RUN_FAILURE,
    }
}
