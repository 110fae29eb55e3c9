//! In-memory event capture for logging assertions.
//!
//! `init_test_capture` installs a process-wide subscriber that keeps every
//! event, flattened to string fields, so tests can check operation
//! boundaries and the issues the diff engine recovered from.

use govtrackr_core_types::schema::{EVENT_ISSUE, FIELD_EVENT, FIELD_OP, FIELD_PATH};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

type EventLog = Arc<Mutex<Vec<CapturedEvent>>>;

/// One captured event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    /// Snapshot path, for diff issues
    pub path: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        Self {
            level,
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            path: fields.get(FIELD_PATH).cloned(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// True for the `event` boundary of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Strings are kept verbatim; every other value uses its `Debug` text,
/// which for numbers, bools and `%display` fields is the plain value.
struct Flatten<'a>(&'a mut HashMap<String, String>);

impl Visit for Flatten<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

struct CaptureLayer(EventLog);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut Flatten(&mut fields));
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields);
        if let Ok(mut log) = self.0.lock() {
            log.push(captured);
        }
    }
}

/// Handle onto the shared event log
#[derive(Clone)]
pub struct TestCapture {
    log: EventLog,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.filter(|e| e.op.as_deref() == Some(op))
    }

    /// Recovered diff issues logged at `path`
    pub fn issues_at(&self, path: &str) -> Vec<CapturedEvent> {
        self.filter(|e| e.is("diff", EVENT_ISSUE) && e.path.as_deref() == Some(path))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.filter(predicate).len()
    }

    /// # Panics
    ///
    /// Panics if no `event` boundary was captured for `op`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let total = self.events().len();
        assert!(
            self.count_events(|e| e.is(op, event)) > 0,
            "no {op}/{event} event among {total} captured"
        );
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    fn filter<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install (once per process) and return the shared capture.
///
/// Tests in one binary share the log, so assertions should filter on an
/// operation name or path unique to the test.
///
/// # Example
///
/// ```
/// use govtrackr_core::logging_facility::test_capture::init_test_capture;
/// use govtrackr_core::log_diff_issue;
///
/// let capture = init_test_capture();
/// log_diff_issue!("doc.example", limit = 4);
/// assert_eq!(capture.issues_at("doc.example").len(), 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let log = EventLog::default();
            // An earlier global subscriber keeps receiving events instead
            let _ = tracing_subscriber::registry()
                .with(CaptureLayer(log.clone()))
                .try_init();
            TestCapture { log }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_lifts_canonical_keys() {
        let fields: HashMap<String, String> = [
            ("op", "diff"),
            ("event", "issue"),
            ("path", "contact.email"),
            ("limit", "4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let event = CapturedEvent::from_fields(Level::WARN, fields);

        assert!(event.is("diff", "issue"));
        assert_eq!(event.path.as_deref(), Some("contact.email"));
        assert_eq!(event.field("limit"), Some("4"));
        assert_eq!(event.field("missing"), None);
    }
}
