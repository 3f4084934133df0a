//! Observable events
//!
//! Every log line names exactly one of these. Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the grades service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    ServiceStart,
    /// Configuration resolved
    ConfigLoaded,
    /// Storage pool opened
    PoolConnected,
    /// Storage pool could not be opened
    PoolConnectFailed,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Pool closed, process exiting
    ShutdownComplete,

    // Uploads
    /// Upload body received
    UploadReceived,
    /// Upload replaced the stored records
    UploadCommitted,
    /// Upload rejected as invalid input
    UploadRejected,
    /// Upload valid but storage failed
    UploadFailed,

    // Queries
    /// Aggregate query answered
    QueryExecuted,
    /// Aggregate query failed in storage
    QueryFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServiceStart => "SERVICE_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::PoolConnected => "POOL_CONNECTED",
            Event::PoolConnectFailed => "POOL_CONNECT_FAILED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::UploadReceived => "UPLOAD_RECEIVED",
            Event::UploadCommitted => "UPLOAD_COMMITTED",
            Event::UploadRejected => "UPLOAD_REJECTED",
            Event::UploadFailed => "UPLOAD_FAILED",

            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
        }
    }

    /// Default severity when logged through `log_event`
    pub fn severity(&self) -> Severity {
        match self {
            Event::PoolConnectFailed => Severity::Fatal,
            Event::UploadFailed | Event::QueryFailed => Severity::Error,
            Event::UploadRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ServiceStart,
            Event::ConfigLoaded,
            Event::PoolConnected,
            Event::PoolConnectFailed,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::UploadReceived,
            Event::UploadCommitted,
            Event::UploadRejected,
            Event::UploadFailed,
            Event::QueryExecuted,
            Event::QueryFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::PoolConnectFailed.severity(), Severity::Fatal);
        assert_eq!(Event::UploadFailed.severity(), Severity::Error);
        assert_eq!(Event::UploadRejected.severity(), Severity::Warn);
        assert_eq!(Event::UploadCommitted.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::UploadCommitted), "UPLOAD_COMMITTED");
    }
}
