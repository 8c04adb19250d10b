//! Lifecycle of the single in-progress practice session.
//!
//! The lesson, start time and input snapshot live in three independent
//! cells. `complete_session` reads them one after another, so a concurrent
//! `begin_session` can interleave with it; callers serialize
//! begin/update/complete for a given session.

use crate::error::{Result, TutorError};
use crate::ledger::ProgressLedger;
use crate::lesson::Lesson;
use crate::metrics::{accuracy_percentage, words_per_minute};
use crate::result::SessionResult;
use chrono::{DateTime, Local};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info};

/// Wall-clock start for reporting plus a monotonic instant for elapsed time.
#[derive(Debug, Clone, Copy)]
struct SessionStart {
    at: DateTime<Local>,
    instant: Instant,
}

impl SessionStart {
    fn now() -> Self {
        Self {
            at: Local::now(),
            instant: Instant::now(),
        }
    }
}

#[derive(Debug)]
pub struct SessionManager {
    ledger: Arc<ProgressLedger>,
    lesson: RwLock<Option<Arc<Lesson>>>,
    started: RwLock<Option<SessionStart>>,
    input: RwLock<String>,
}

fn store<T>(cell: &RwLock<T>, value: T) {
    *cell.write().unwrap_or_else(PoisonError::into_inner) = value;
}

fn load<T: Clone>(cell: &RwLock<T>) -> T {
    cell.read().unwrap_or_else(PoisonError::into_inner).clone()
}

impl SessionManager {
    pub fn new(ledger: Arc<ProgressLedger>) -> Self {
        Self {
            ledger,
            lesson: RwLock::new(None),
            started: RwLock::new(None),
            input: RwLock::new(String::new()),
        }
    }

    pub fn ledger(&self) -> &Arc<ProgressLedger> {
        &self.ledger
    }

    /// Bind `lesson`, restart the clock and clear the input. Valid at any time.
    pub fn begin_session(&self, lesson: Lesson) {
        info!(lesson = %lesson.id, "session started");
        store(&self.lesson, Some(Arc::new(lesson)));
        store(&self.started, Some(SessionStart::now()));
        store(&self.input, String::new());
    }

    /// Replace the input snapshot. Last write wins.
    pub fn update_input(&self, text: impl Into<String>) {
        store(&self.input, text.into());
    }

    /// Score the current input against the bound lesson and record it.
    ///
    /// Session state is left untouched, so calling this again before the
    /// next `begin_session` yields another result with a longer duration.
    pub fn complete_session(&self) -> Result<SessionResult> {
        let lesson = load(&self.lesson).ok_or_else(|| {
            TutorError::InvalidOperation("no active lesson to complete".to_string())
        })?;
        let started = load(&self.started).ok_or_else(|| {
            TutorError::InvalidOperation("session start time missing".to_string())
        })?;
        let input = load(&self.input);

        let elapsed = started.instant.elapsed();
        let (accuracy, error_count) = accuracy_percentage(&lesson.passage, &input);
        let wpm = words_per_minute(
            i64::try_from(input.chars().count()).unwrap_or(i64::MAX),
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
        );

        let result = SessionResult {
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            started_at: started.at,
            duration: elapsed,
            words_per_minute: wpm,
            accuracy,
            error_count,
        };

        debug!(summary = %result.summary(), "session completed");
        self.ledger.record(result.clone());

        Ok(result)
    }

    pub fn current_lesson(&self) -> Option<Arc<Lesson>> {
        load(&self.lesson)
    }

    pub fn current_input(&self) -> String {
        load(&self.input)
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        load(&self.started).map(|s| s.at)
    }

    pub fn has_started(&self) -> bool {
        load(&self.started).is_some()
    }
}
