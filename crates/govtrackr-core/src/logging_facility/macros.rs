//! Canonical logging macros
//!
//! Every operation boundary emits the same field set (`component`, `op`,
//! `event`, plus `duration_ms` and error classification on the way out).
//! Issues the diff engine recovers from are logged with the path they
//! occurred at.

/// Shared expansion: one event at `$level` with the canonical fields first.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use govtrackr_core::log_op_start;
/// log_op_start!("compute_diff");
/// log_op_start!("compute_diff", left_fields = 3);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use govtrackr_core::log_op_end;
/// log_op_end!("compute_diff", duration_ms = 3);
/// log_op_end!("compute_diff", duration_ms = 3, entry_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log an operation error
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError);
/// its kind, code and path are attached.
///
/// # Example
///
/// ```
/// # use govtrackr_core::log_op_error;
/// use govtrackr_core::errors::{ExError, ExErrorKind};
///
/// let err = ExError::new(ExErrorKind::InvalidSnapshot);
/// log_op_error!("parse_snapshot", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_path = ex_err.path().unwrap_or("")
            $(, $($field)*)?
        );
    }};
}

/// Log a comparison issue recorded inline on a diff entry
///
/// # Example
///
/// ```
/// # use govtrackr_core::log_diff_issue;
/// log_diff_issue!("contact.address", limit = 64);
/// ```
#[macro_export]
macro_rules! log_diff_issue {
    ($path:expr, $($field:tt)*) => {
        $crate::__log_op_event!(warn, "diff", EVENT_ISSUE, path = %$path, $($field)*)
    };
}
