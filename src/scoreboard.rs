use crate::ledger::ProgressLedger;
use std::fmt;

/// One-line aggregate of the ledger shown under the typing area.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoreboard {
    pub average_wpm: f64,
    pub average_accuracy: f64,
    pub target_wpm: u32,
    pub streak_active: bool,
}

impl Scoreboard {
    pub fn from_ledger(ledger: &ProgressLedger, target_wpm: u32, streak_hours: u64) -> Self {
        Self {
            average_wpm: ledger.average_wpm(),
            average_accuracy: ledger.average_accuracy(),
            target_wpm,
            streak_active: ledger.streak_active_within(streak_hours),
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let streak = if self.streak_active {
            "Streak active"
        } else {
            "Start today's streak"
        };
        write!(
            f,
            "Averages • WPM {} | Accuracy {}% | Target {} WPM | {}",
            self.average_wpm.round(),
            self.average_accuracy.round(),
            self.target_wpm,
            streak
        )
    }
}
