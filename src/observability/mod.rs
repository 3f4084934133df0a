//! Observability subsystem
//!
//! Structured JSON logging of lifecycle, upload and query events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on request handling; a failed write is ignored
//! 3. Deterministic output for the same event and fields
//!
//! # Usage
//!
//! ```ignore
//! use student_grades::observability::{Logger, Event, log_event_with_fields};
//!
//! log_event_with_fields(Event::UploadCommitted, &[("records_loaded", "42")]);
//! Logger::warn("UPLOAD_REJECTED", &[("kind", "no_data")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // This just verifies no panic
        log_event(Event::ServiceStart);
        log_event(Event::ShutdownComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("port", "8000")]);
    }
}
