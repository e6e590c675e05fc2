//! Observability for the content core
//!
//! - Structured logging (JSON lines)
//! - Typed events
//! - Monotonic counters
//!
//! Observability is read-only: a logging or metrics failure never changes
//! the outcome of the operation being observed.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event at the severity its kind implies
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    if event.is_degraded() {
        Logger::warn(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}

/// Log a failure event to stderr
pub fn log_failure(event: Event, error: &dyn std::error::Error, fields: &[(&str, &str)]) {
    let message = error.to_string();
    let mut all: Vec<(&str, &str)> = fields.to_vec();
    all.push(("error", message.as_str()));
    Logger::error(event.as_str(), &all);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::GateReady, &[]);
        log_event(Event::AuthorFallback, &[("article", "a1")]);
    }

    #[test]
    fn test_log_failure_does_not_panic() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        log_failure(Event::FeedReadFailed, &err, &[("view", "public")]);
    }
}
