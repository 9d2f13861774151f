//! Challenge session state machine.
//!
//! Like the rest of the core it has no internal thread: every `tick()` is one
//! elapsed second, supplied by the caller.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ChallengeMode, ChallengeState};
use crate::events::Event;

/// Largest countdown the input accepts (five digits).
pub const MAX_COUNTDOWN_SECS: u32 = 99_999;

/// Displayable state of a session, published once per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSnapshot {
    pub drink_id: String,
    pub mode: ChallengeMode,
    pub state: ChallengeState,
    pub elapsed_secs: u32,
    pub remaining_secs: u32,
    pub countdown_secs: u32,
    /// The counter for the current mode.
    pub display_secs: u32,
    pub pending_confirmation: bool,
    pub completion_dialog: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSession {
    drink_id: String,
    mode: ChallengeMode,
    state: ChallengeState,
    elapsed_secs: u32,
    remaining_secs: u32,
    /// User-chosen countdown length; always in `1..=MAX_COUNTDOWN_SECS`.
    countdown_secs: u32,
}

impl ChallengeSession {
    /// New idle session. `countdown_secs` outside the accepted range falls
    /// back to 60.
    pub fn new(drink_id: impl Into<String>, countdown_secs: u32) -> Self {
        let countdown_secs = if valid_countdown(countdown_secs) {
            countdown_secs
        } else {
            60
        };
        Self {
            drink_id: drink_id.into(),
            mode: ChallengeMode::CountUp,
            state: ChallengeState::Idle,
            elapsed_secs: 0,
            remaining_secs: countdown_secs,
            countdown_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn drink_id(&self) -> &str {
        &self.drink_id
    }

    pub fn mode(&self) -> ChallengeMode {
        self.mode
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ChallengeState::Running
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    pub fn display_secs(&self) -> u32 {
        match self.mode {
            ChallengeMode::CountUp => self.elapsed_secs,
            ChallengeMode::CountDown => self.remaining_secs,
        }
    }

    pub fn snapshot(&self) -> ChallengeSnapshot {
        ChallengeSnapshot {
            drink_id: self.drink_id.clone(),
            mode: self.mode,
            state: self.state,
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs,
            countdown_secs: self.countdown_secs,
            display_secs: self.display_secs(),
            pending_confirmation: self.state == ChallengeState::AwaitingConfirmation,
            completion_dialog: self.state == ChallengeState::Completed,
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Switch between count-up and count-down. Only allowed while idle.
    pub fn set_mode(&mut self, mode: ChallengeMode) -> Option<Event> {
        if self.state != ChallengeState::Idle {
            return None;
        }
        self.mode = mode;
        Some(Event::ModeChanged {
            drink_id: self.drink_id.clone(),
            mode,
            at: Utc::now(),
        })
    }

    /// Parse user input as the countdown length. Anything other than one to
    /// five digits naming a positive number is ignored, as is input while
    /// the session is not idle. Returns whether the value was taken.
    pub fn set_countdown_input(&mut self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() || input.len() > 5 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match input.parse::<u32>() {
            Ok(secs) => self.set_countdown_secs(secs),
            Err(_) => false,
        }
    }

    pub fn set_countdown_secs(&mut self, secs: u32) -> bool {
        if self.state != ChallengeState::Idle || !valid_countdown(secs) {
            return false;
        }
        self.countdown_secs = secs;
        self.remaining_secs = secs;
        true
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state != ChallengeState::Idle {
            return None;
        }
        if self.mode == ChallengeMode::CountDown && self.remaining_secs == 0 {
            self.remaining_secs = self.countdown_secs;
        }
        self.state = ChallengeState::Running;
        Some(Event::ChallengeStarted {
            drink_id: self.drink_id.clone(),
            mode: self.mode,
            counter_secs: self.display_secs(),
            at: Utc::now(),
        })
    }

    /// Advance one second. Returns `ChallengeCompleted` when a countdown
    /// reaches zero, `ChallengeTicked` otherwise, and `None` when not
    /// running.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != ChallengeState::Running {
            return None;
        }
        match self.mode {
            ChallengeMode::CountUp => {
                self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            }
            ChallengeMode::CountDown => {
                self.remaining_secs = self.remaining_secs.saturating_sub(1);
                if self.remaining_secs == 0 {
                    self.state = ChallengeState::Completed;
                    return Some(Event::ChallengeCompleted {
                        drink_id: self.drink_id.clone(),
                        duration_secs: self.countdown_secs,
                        at: Utc::now(),
                    });
                }
            }
        }
        Some(Event::ChallengeTicked {
            drink_id: self.drink_id.clone(),
            mode: self.mode,
            counter_secs: self.display_secs(),
            at: Utc::now(),
        })
    }

    /// User stop. Count-up waits for confirmation; count-down just goes
    /// back to idle with the remaining time kept.
    pub fn stop(&mut self) -> Option<Event> {
        if self.state != ChallengeState::Running {
            return None;
        }
        self.state = match self.mode {
            ChallengeMode::CountUp => ChallengeState::AwaitingConfirmation,
            ChallengeMode::CountDown => ChallengeState::Idle,
        };
        Some(Event::ChallengeStopped {
            drink_id: self.drink_id.clone(),
            mode: self.mode,
            state: self.state,
            counter_secs: self.display_secs(),
            at: Utc::now(),
        })
    }

    /// Close the completion dialog of a finished countdown. The configured
    /// duration becomes the candidate time.
    pub fn acknowledge(&mut self) -> Option<Event> {
        if self.state != ChallengeState::Completed {
            return None;
        }
        let candidate = self.countdown_secs;
        self.clear();
        Some(self.finished(Some(candidate)))
    }

    /// Answer the "did you make it?" prompt after a stopped count-up.
    /// A zero elapsed time is never offered as a candidate.
    pub fn confirm(&mut self, made_it: bool) -> Option<Event> {
        if self.state != ChallengeState::AwaitingConfirmation {
            return None;
        }
        let candidate = (made_it && self.elapsed_secs > 0).then_some(self.elapsed_secs);
        self.clear();
        Some(self.finished(candidate))
    }

    pub fn reset(&mut self) -> Event {
        self.clear();
        Event::ChallengeReset {
            drink_id: self.drink_id.clone(),
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear(&mut self) {
        self.state = ChallengeState::Idle;
        self.elapsed_secs = 0;
        self.remaining_secs = self.countdown_secs;
    }

    fn finished(&self, candidate_secs: Option<u32>) -> Event {
        Event::ChallengeFinished {
            drink_id: self.drink_id.clone(),
            candidate_secs,
            at: Utc::now(),
        }
    }
}

fn valid_countdown(secs: u32) -> bool {
    (1..=MAX_COUNTDOWN_SECS).contains(&secs)
}
