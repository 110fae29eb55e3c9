#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::snap;
use govtrackr_core::config::DiffOptions;
use govtrackr_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_ISSUE, EVENT_START, FIELD_CHANGED_COUNT, FIELD_DURATION_MS,
    FIELD_ENTRY_COUNT, FIELD_ERR_CODE, FIELD_ERR_KIND,
};
use govtrackr_core::diff::compute_diff;
use govtrackr_core::errors::DiffError;
use govtrackr_core::logging_facility::test_capture::init_test_capture;
use govtrackr_core::{log_diff_issue, log_op_end, log_op_error, log_op_start};
use serde_json::json;
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert!(
        !start_events.is_empty(),
        "Should have captured at least one start event"
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_code_and_path() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = DiffError::TypeKindMismatch {
        path: "positions".to_string(),
        left: govtrackr_core::ValueKind::Array,
        right: govtrackr_core::ValueKind::Object,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");

    let error_event = &error_events[0];
    assert_eq!(error_event.level, Level::ERROR);
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_TYPE_KIND_MISMATCH"));
    assert_eq!(error_event.field(FIELD_ERR_KIND), Some("TypeKindMismatch"));
    assert_eq!(error_event.field("err_path"), Some("positions"));
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_4";

    log_op_start!(op_name, left_fields = 3);
    log_op_end!(op_name, duration_ms = 42, entry_count = 3);

    assert_eq!(
        capture.count_events(|e| e.op.as_deref() == Some(op_name)
            && e.event.as_deref() == Some(EVENT_START)),
        1
    );
    assert_eq!(
        capture.count_events(|e| e.op.as_deref() == Some(op_name)
            && e.event.as_deref() == Some(EVENT_END)),
        1
    );
}

#[test]
fn test_compute_diff_logs_boundaries() {
    let capture = init_test_capture();

    let left = snap(json!({"logBoundaryProbe": "A"}));
    let right = snap(json!({"logBoundaryProbe": "B"}));
    compute_diff(&left, &right, &DiffOptions::default()).unwrap();

    capture.assert_event_exists("compute_diff", EVENT_START);
    capture.assert_event_exists("compute_diff", EVENT_END);
    let ends = capture.events_for_op("compute_diff");
    assert!(ends.iter().any(|e| e.event.as_deref() == Some(EVENT_END)
        && e.field(FIELD_ENTRY_COUNT).is_some()
        && e.field(FIELD_CHANGED_COUNT).is_some()));
}

#[test]
fn test_type_kind_mismatch_logged_as_issue() {
    let capture = init_test_capture();

    let left = snap(json!({"mismatchLogProbe": {"a": 1}}));
    let right = snap(json!({"mismatchLogProbe": [1]}));
    compute_diff(&left, &right, &DiffOptions::default()).unwrap();

    let issues = capture.issues_at("mismatchLogProbe");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].event.as_deref(), Some(EVENT_ISSUE));
    assert_eq!(issues[0].level, Level::WARN);
    assert_eq!(issues[0].field("left_kind"), Some("object"));
    assert_eq!(issues[0].field("right_kind"), Some("array"));
}

#[test]
fn test_depth_overflow_logged_as_issue() {
    let capture = init_test_capture();

    let left = snap(json!({"depthLogProbe": {"inner": {"x": 1}}}));
    let right = snap(json!({"depthLogProbe": {"inner": {"x": 2}}}));
    let options = DiffOptions::default().with_max_depth(2);
    compute_diff(&left, &right, &options).unwrap();

    let issues = capture.issues_at("depthLogProbe.inner");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].field("limit"), Some("2"));
}

#[test]
fn test_fail_fast_logs_end_error() {
    let capture = init_test_capture();

    let left = snap(json!({"failFastLogProbe": "x"}));
    let right = snap(json!({"failFastLogProbe": {"y": 1}}));
    let options = DiffOptions::default().with_fail_fast(true);
    let err = compute_diff(&left, &right, &options).unwrap_err();
    assert_eq!(err.code(), "ERR_TYPE_KIND_MISMATCH");

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("compute_diff")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err_path") == Some("failFastLogProbe")
    });
    assert_eq!(errors, 1);
}

#[test]
fn test_log_diff_issue_macro() {
    let capture = init_test_capture();

    log_diff_issue!("issueMacroProbe.items", limit = 7);

    let issues = capture.issues_at("issueMacroProbe.items");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].level, Level::WARN);
    assert_eq!(issues[0].field("limit"), Some("7"));
}
