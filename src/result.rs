use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;

/// Outcome of one completed session. Built once by the session manager and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResult {
    pub lesson_id: String,
    pub lesson_title: String,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
    /// 0..=350
    pub words_per_minute: f64,
    /// 0..=100
    pub accuracy: f64,
    pub error_count: usize,
}

impl SessionResult {
    pub fn summary(&self) -> String {
        format!(
            "{} WPM | {}% accuracy | {} errors",
            self.words_per_minute.round(),
            self.accuracy.round(),
            self.error_count
        )
    }
}
