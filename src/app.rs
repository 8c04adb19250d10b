use crate::coach::CoachPoller;
use crate::config::Config;
use crate::ledger::ProgressLedger;
use crate::lesson::{Lesson, LessonCatalog};
use crate::result::SessionResult;
use crate::runtime::{FixedTicker, TutorEvent};
use crate::scoreboard::Scoreboard;
use crate::session::SessionManager;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lessons,
    Typing,
    Results,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Presentation state driving the session manager from key events.
#[derive(Debug)]
pub struct App {
    pub catalog: LessonCatalog,
    pub config: Config,
    pub manager: SessionManager,
    pub screen: Screen,
    pub selected: usize,
    pub input: String,
    /// When the countdown for the current session runs out.
    pub deadline: Option<Instant>,
    /// Countdown as of the last tick, for display.
    pub seconds_remaining: Option<f64>,
    pub last_result: Option<SessionResult>,
    pub coaching_note: Option<String>,
    coach_rx: Option<Receiver<String>>,
    poller: Option<CoachPoller>,
}

impl App {
    pub fn new(catalog: LessonCatalog, config: Config, ledger: Arc<ProgressLedger>) -> Self {
        Self {
            catalog,
            config,
            manager: SessionManager::new(ledger),
            screen: Screen::Lessons,
            selected: 0,
            input: String::new(),
            deadline: None,
            seconds_remaining: None,
            last_result: None,
            coaching_note: None,
            coach_rx: None,
            poller: None,
        }
    }

    /// Start the background coach that refreshes `coaching_note`.
    pub fn start_coaching(&mut self) {
        let (tx, rx) = mpsc::channel();
        self.poller = Some(CoachPoller::spawn(
            Arc::clone(self.manager.ledger()),
            FixedTicker::new(self.config.coach_interval()),
            self.config.coach_initial_delay(),
            tx,
        ));
        self.coach_rx = Some(rx);
    }

    pub fn lessons(&self) -> Vec<&Lesson> {
        self.catalog.all()
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        self.lessons().get(self.selected).copied()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::from_ledger(
            self.manager.ledger(),
            self.config.target_wpm,
            self.config.streak_hours,
        )
    }

    pub fn recent_sessions(&self) -> Vec<SessionResult> {
        self.manager
            .ledger()
            .recent_sessions(self.config.recent_limit)
    }

    pub fn begin(&mut self, lesson: Lesson) {
        self.manager.begin_session(lesson);
        self.input.clear();
        let countdown = Duration::from_secs(self.config.difficulty.session_secs());
        self.deadline = Some(Instant::now() + countdown);
        self.seconds_remaining = Some(countdown.as_secs_f64());
        self.screen = Screen::Typing;
    }

    pub fn finish(&mut self) {
        match self.manager.complete_session() {
            Ok(result) => {
                self.last_result = Some(result);
                self.deadline = None;
                self.seconds_remaining = None;
                self.screen = Screen::Results;
            }
            Err(e) => {
                warn!(error = %e, "could not complete session");
                self.screen = Screen::Lessons;
            }
        }
    }

    fn passage_len(&self) -> usize {
        self.manager
            .current_lesson()
            .map(|l| l.passage.chars().count())
            .unwrap_or(0)
    }

    /// Drain coaching notes and advance the countdown to `now`.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(rx) = &self.coach_rx {
            while let Ok(note) = rx.try_recv() {
                self.coaching_note = Some(note);
            }
        }

        if self.screen != Screen::Typing {
            return;
        }
        if let Some(deadline) = self.deadline {
            let remaining = deadline.saturating_duration_since(now);
            self.seconds_remaining = Some(remaining.as_secs_f64());
            if remaining.is_zero() {
                self.finish();
            }
        }
    }

    /// One step of the UI loop.
    pub fn handle_event(&mut self, event: TutorEvent) -> Control {
        match event {
            TutorEvent::Tick => {
                self.on_tick(Instant::now());
                Control::Continue
            }
            TutorEvent::Resize => Control::Continue,
            TutorEvent::Key(key) => self.handle_key(key),
            TutorEvent::Closed => {
                warn!("input closed, shutting down");
                Control::Quit
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        match self.screen {
            Screen::Lessons => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.selected = self.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.selected + 1 < self.lessons().len() {
                        self.selected += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(lesson) = self.selected_lesson().cloned() {
                        self.begin(lesson);
                    }
                }
                KeyCode::Char('h') => self.screen = Screen::History,
                _ => {}
            },
            Screen::Typing => match key.code {
                KeyCode::Char(c) => {
                    self.input.push(c);
                    self.manager.update_input(self.input.clone());
                    if self.input.chars().count() >= self.passage_len() {
                        self.finish();
                    }
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    self.manager.update_input(self.input.clone());
                }
                KeyCode::Tab => self.finish(),
                _ => {}
            },
            Screen::Results => match key.code {
                KeyCode::Char('r') => {
                    if let Some(lesson) = self.manager.current_lesson() {
                        self.begin(Lesson::clone(&lesson));
                    }
                }
                KeyCode::Char('n') | KeyCode::Enter => self.screen = Screen::Lessons,
                KeyCode::Char('h') => self.screen = Screen::History,
                _ => {}
            },
            Screen::History => match key.code {
                KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Enter => {
                    self.screen = Screen::Lessons
                }
                _ => {}
            },
        }

        Control::Continue
    }
}
