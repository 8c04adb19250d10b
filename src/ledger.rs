//! Process-lifetime history of completed sessions.
//!
//! Writes replace the shared snapshot copy-on-write, so a reader holds the
//! lock only long enough to clone an `Arc` and then iterates without it.
//! Readers never see a partially appended entry and never wait on each other.
//!
//! Subscribers are notified under the append lock, so every subscriber sees
//! results in append order. Each subscription buffers at most
//! `SUBSCRIBER_BACKLOG` undelivered results; a subscriber that falls further
//! behind misses the overflow rather than stalling `record`.

use crate::result::SessionResult;
use crate::util::mean;
use chrono::{Local, TimeDelta};
use itertools::Itertools;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

const SECS_PER_HOUR: u64 = 3600;

/// Undelivered results buffered per subscriber.
pub const SUBSCRIBER_BACKLOG: usize = 64;

#[derive(Debug, Default)]
pub struct ProgressLedger {
    sessions: RwLock<Arc<Vec<SessionResult>>>,
    subscribers: Mutex<Vec<SyncSender<SessionResult>>>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result and notify live subscribers.
    pub fn record(&self, result: SessionResult) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // clones only when a reader still holds the previous snapshot
        Arc::make_mut(&mut *sessions).push(result.clone());

        debug!(
            lesson = %result.lesson_id,
            wpm = result.words_per_minute,
            accuracy = result.accuracy,
            len = sessions.len(),
            "recorded session"
        );

        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| match tx.try_send(result.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("subscriber backlog full, dropping notification");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Receive results recorded from now on, in append order, up to
    /// `SUBSCRIBER_BACKLOG` undrained. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<SessionResult> {
        let (tx, rx) = mpsc::sync_channel(SUBSCRIBER_BACKLOG);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Current contents in insertion order.
    pub fn snapshot(&self) -> Arc<Vec<SessionResult>> {
        Arc::clone(&self.sessions.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Most recent first. Equal start times list the later insert first.
    pub fn history(&self) -> Vec<SessionResult> {
        self.snapshot()
            .iter()
            .rev()
            .sorted_by(|a, b| b.started_at.cmp(&a.started_at))
            .cloned()
            .collect()
    }

    pub fn recent_sessions(&self, limit: usize) -> Vec<SessionResult> {
        self.history().into_iter().take(limit).collect()
    }

    pub fn last_session(&self) -> Option<SessionResult> {
        // max_by_key keeps the last maximum, matching history() ordering
        self.snapshot()
            .iter()
            .max_by_key(|r| r.started_at)
            .cloned()
    }

    pub fn average_wpm(&self) -> f64 {
        let wpms = self
            .snapshot()
            .iter()
            .map(|r| r.words_per_minute)
            .collect::<Vec<f64>>();
        mean(&wpms).unwrap_or(0.0)
    }

    pub fn average_accuracy(&self) -> f64 {
        let accuracies = self
            .snapshot()
            .iter()
            .map(|r| r.accuracy)
            .collect::<Vec<f64>>();
        mean(&accuracies).unwrap_or(0.0)
    }

    /// True if any session started within the last `hours`. A recency
    /// window only; it does not track consecutive days.
    pub fn streak_active_within(&self, hours: u64) -> bool {
        let sessions = self.snapshot();
        let window = i64::try_from(hours.saturating_mul(SECS_PER_HOUR))
            .ok()
            .and_then(TimeDelta::try_seconds);

        match window.and_then(|w| Local::now().checked_sub_signed(w)) {
            Some(cutoff) => sessions.iter().any(|r| r.started_at > cutoff),
            // window reaches past the representable range
            None => !sessions.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use std::thread;
    use std::time::Duration;

    fn result_at(started_at: DateTime<Local>, wpm: f64, accuracy: f64) -> SessionResult {
        SessionResult {
            lesson_id: "fluency_story".into(),
            lesson_title: "Guided Story Sprint".into(),
            started_at,
            duration: Duration::from_secs(30),
            words_per_minute: wpm,
            accuracy,
            error_count: 0,
        }
    }

    fn at(hour: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn test_history_most_recent_first() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(10, 0), 40.0, 90.0));
        ledger.record(result_at(at(10, 5), 50.0, 95.0));
        ledger.record(result_at(at(10, 2), 45.0, 92.0));

        let starts = ledger
            .history()
            .iter()
            .map(|r| r.started_at)
            .collect::<Vec<_>>();
        assert_eq!(starts, vec![at(10, 5), at(10, 2), at(10, 0)]);
    }

    #[test]
    fn test_history_ties_list_later_insert_first() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(9, 0), 10.0, 90.0));
        ledger.record(result_at(at(9, 0), 20.0, 90.0));

        let history = ledger.history();
        assert_eq!(history[0].words_per_minute, 20.0);
        assert_eq!(history[1].words_per_minute, 10.0);
        assert_eq!(ledger.last_session().unwrap().words_per_minute, 20.0);
    }

    #[test]
    fn test_recent_sessions_limit() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(8, 0), 30.0, 90.0));
        ledger.record(result_at(at(8, 30), 35.0, 90.0));
        ledger.record(result_at(at(9, 0), 40.0, 90.0));

        let recent = ledger.recent_sessions(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].started_at, at(9, 0));
        assert_eq!(recent[1].started_at, at(8, 30));

        assert_eq!(ledger.recent_sessions(10).len(), 3);
        assert!(ledger.recent_sessions(0).is_empty());
    }

    #[test]
    fn test_last_session() {
        let ledger = ProgressLedger::new();
        assert!(ledger.last_session().is_none());

        ledger.record(result_at(at(10, 5), 50.0, 95.0));
        ledger.record(result_at(at(10, 0), 40.0, 90.0));

        assert_eq!(ledger.last_session().unwrap().started_at, at(10, 5));
    }

    #[test]
    fn test_empty_averages_are_zero() {
        let ledger = ProgressLedger::new();

        assert_eq!(ledger.average_wpm(), 0.0);
        assert_eq!(ledger.average_accuracy(), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_averages() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(10, 0), 40.0, 90.0));
        ledger.record(result_at(at(10, 1), 60.0, 100.0));

        assert_eq!(ledger.average_wpm(), 50.0);
        assert_eq!(ledger.average_accuracy(), 95.0);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_streak_is_a_recency_window() {
        let ledger = ProgressLedger::new();
        assert!(!ledger.streak_active_within(24));

        ledger.record(result_at(Local::now() - TimeDelta::hours(2), 40.0, 90.0));

        assert!(ledger.streak_active_within(24));
        assert!(!ledger.streak_active_within(1));
        assert!(ledger.streak_active_within(u64::MAX));
    }

    #[test]
    fn test_subscribers_receive_new_results() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(7, 0), 10.0, 90.0));

        let rx = ledger.subscribe();
        ledger.record(result_at(at(7, 5), 20.0, 90.0));

        let got = rx.try_recv().unwrap();
        assert_eq!(got.started_at, at(7, 5));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let ledger = ProgressLedger::new();
        drop(ledger.subscribe());
        let rx = ledger.subscribe();

        ledger.record(result_at(at(7, 0), 10.0, 90.0));

        assert_eq!(ledger.subscribers.lock().unwrap().len(), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_undrained_subscriber_is_capped() {
        let ledger = ProgressLedger::new();
        let rx = ledger.subscribe();

        for i in 0..(SUBSCRIBER_BACKLOG as u32 + 10) {
            ledger.record(result_at(at(6, 0), f64::from(i), 90.0));
        }

        let received = rx.try_iter().collect::<Vec<_>>();
        assert_eq!(received.len(), SUBSCRIBER_BACKLOG);
        assert_eq!(received[0].words_per_minute, 0.0);
        assert_eq!(ledger.len(), SUBSCRIBER_BACKLOG + 10);

        // still subscribed once drained
        ledger.record(result_at(at(6, 1), 1.0, 90.0));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_concurrent_records_notify_in_append_order() {
        let ledger = Arc::new(ProgressLedger::new());
        let rx = ledger.subscribe();

        let writers = (0..4)
            .map(|w| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..10 {
                        ledger.record(result_at(at(w + 1, i), f64::from(w * 100 + i), 90.0));
                    }
                })
            })
            .collect::<Vec<_>>();
        for w in writers {
            w.join().unwrap();
        }

        let notified = rx
            .try_iter()
            .map(|r| r.words_per_minute)
            .collect::<Vec<_>>();
        let appended = ledger
            .snapshot()
            .iter()
            .map(|r| r.words_per_minute)
            .collect::<Vec<_>>();
        assert_eq!(notified.len(), 40);
        assert_eq!(notified, appended);
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_records() {
        let ledger = ProgressLedger::new();
        ledger.record(result_at(at(7, 0), 10.0, 90.0));

        let snapshot = ledger.snapshot();
        ledger.record(result_at(at(7, 5), 20.0, 90.0));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let ledger = Arc::new(ProgressLedger::new());

        let writers = (0..4)
            .map(|w| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..50 {
                        ledger.record(result_at(at(w + 1, i), 40.0, 90.0));
                    }
                })
            })
            .collect::<Vec<_>>();

        let reader = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..200 {
                    let history = ledger.history();
                    assert!(history.len() <= 200);
                    let _ = ledger.average_wpm();
                    let _ = ledger.last_session();
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        assert_eq!(ledger.len(), 200);
        assert_eq!(ledger.average_wpm(), 40.0);
    }
}
