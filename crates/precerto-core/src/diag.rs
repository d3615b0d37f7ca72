//! Bounded in-memory log sink for on-device diagnostics.
//!
//! Keeps the most recent events (newest first) in a fixed-capacity ring so a
//! debug surface can show what the pipeline did without shipping logs
//! anywhere. Only formatted event messages are stored; credentials and raw
//! payloads never reach the logging layer in the first place.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 50;

/// One captured log event.
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Fixed-capacity ring of recent log events.
#[derive(Debug)]
pub struct DiagnosticsBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<DiagnosticEntry>>,
}

impl DiagnosticsBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        })
    }

    /// Returns the retained entries, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn push(&self, entry: DiagnosticEntry) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.len() == self.capacity {
            entries.pop_back();
        }
        entries.push_front(entry);
    }
}

/// `tracing` layer that mirrors every event into a [`DiagnosticsBuffer`].
pub struct DiagnosticsLayer {
    buffer: Arc<DiagnosticsBuffer>,
}

impl DiagnosticsLayer {
    #[must_use]
    pub fn new(buffer: Arc<DiagnosticsBuffer>) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticsLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.buffer.push(DiagnosticEntry {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.render(),
        });
    }
}

/// Collects the `message` field plus any structured fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn render(self) -> String {
        match self.message {
            Some(message) if self.fields.is_empty() => message,
            Some(message) => format!("{message}{}", self.fields),
            None => self.fields.trim_start().to_owned(),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}
