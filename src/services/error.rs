//! Error handling utilities for route handlers

/// Extension trait for logging errors and converting them into the
/// message string carried by the error response envelope.
pub trait LogErr<T> {
    /// Log error with context and return its display form
    fn log_err(self, context: &str) -> Result<T, String>;
}

impl<T, E: std::fmt::Display> LogErr<T> for Result<T, E> {
    fn log_err(self, context: &str) -> Result<T, String> {
        self.map_err(|e| {
            log::error!("{}: {}", context, e);
            e.to_string()
        })
    }
}
