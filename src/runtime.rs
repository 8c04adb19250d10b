//! Event plumbing for the TUI loop.
//!
//! Ticks come from their own thread so the clock keeps running while keys
//! arrive. A reader that fails (terminal gone) delivers one `Closed` and
//! stops; the loop is expected to quit on it.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::debug;

#[derive(Clone, Debug)]
pub enum TutorEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The input source is gone; nothing more will arrive from it.
    Closed,
}

/// Configurable ticker interface, shared by the UI loop and the coach poller
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Merges ticks and input events into one ordered stream.
pub struct EventPump {
    tx: Sender<TutorEvent>,
    rx: Receiver<TutorEvent>,
}

impl EventPump {
    /// Ticks only. Feed other events through `sender()`.
    pub fn new<T: Ticker>(ticker: T) -> Self {
        let (tx, rx) = mpsc::channel();

        let tick_tx = tx.clone();
        thread::spawn(move || loop {
            thread::sleep(ticker.interval());
            if tick_tx.send(TutorEvent::Tick).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Ticks plus events pulled from `read`. `Ok(None)` means "nothing of
    /// interest"; an error ends the reader with a `Closed` event.
    pub fn with_reader<T, F>(ticker: T, mut read: F) -> Self
    where
        T: Ticker,
        F: FnMut() -> io::Result<Option<TutorEvent>> + Send + 'static,
    {
        let pump = Self::new(ticker);
        let tx = pump.sender();

        thread::spawn(move || loop {
            let evt = match read() {
                Ok(Some(evt)) => evt,
                Ok(None) => continue,
                Err(e) => {
                    debug!(error = %e, "input reader stopped");
                    let _ = tx.send(TutorEvent::Closed);
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        pump
    }

    /// Production pump reading the terminal through crossterm.
    pub fn terminal<T: Ticker>(ticker: T) -> Self {
        Self::with_reader(ticker, read_terminal_event)
    }

    pub fn sender(&self) -> Sender<TutorEvent> {
        self.tx.clone()
    }

    /// Blocks until the next event.
    pub fn next(&self) -> TutorEvent {
        // self.tx keeps the channel open, so recv only fails if that changes
        self.rx.recv().unwrap_or(TutorEvent::Closed)
    }
}

fn read_terminal_event() -> io::Result<Option<TutorEvent>> {
    Ok(match event::read()? {
        // ignore key releases on terminals that report them
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(TutorEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(TutorEvent::Resize),
        _ => None,
    })
}
