//! Coaching notes derived from the latest recorded session, and the
//! background poller that delivers them.

use crate::ledger::ProgressLedger;
use crate::result::SessionResult;
use crate::runtime::Ticker;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Below this accuracy the tip asks for a slower pace.
pub const ACCURACY_FLOOR: f64 = 92.0;
/// Below this speed (with acceptable accuracy) the tip suggests warmups.
pub const WARMUP_WPM: f64 = 40.0;

pub fn guidance_for(result: &SessionResult) -> String {
    let tip = if result.accuracy < ACCURACY_FLOOR {
        "Tip: Slow down slightly and breathe every other sentence."
    } else if result.words_per_minute < WARMUP_WPM {
        "Tip: Practice warmups to build finger agility before longer runs."
    } else {
        "Great job! Try a fluency run to keep momentum."
    };

    format!(
        "Lesson: {}\nFocus on {}% accuracy before chasing speed.\n{}\nTime on task: {}s. Record at least three runs per day for steady growth.",
        result.lesson_title,
        result.accuracy.round(),
        tip,
        result.duration.as_secs()
    )
}

/// Periodically reads the ledger's latest session and pushes its guidance
/// into a channel. Stops when the receiving side hangs up, on `stop`, or on
/// drop.
#[derive(Debug)]
pub struct CoachPoller {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CoachPoller {
    pub fn spawn<T: Ticker>(
        ledger: Arc<ProgressLedger>,
        ticker: T,
        initial_delay: Duration,
        sink: Sender<String>,
    ) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            info!(interval_ms = ticker.interval().as_millis() as u64, "coach poller started");
            let mut wait = initial_delay;
            loop {
                match stop_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                if let Some(last) = ledger.last_session() {
                    if sink.send(guidance_for(&last)).is_err() {
                        debug!("coach sink closed");
                        break;
                    }
                }
                wait = ticker.interval();
            }
            info!("coach poller stopped");
        });

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        // dropping the sender wakes the worker immediately
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CoachPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
