//! Challenge mode: time yourself making a drink.
//!
//! [`ChallengeSession`] is the state machine and does not keep time itself;
//! [`ChallengeRunner`] drives it once per second on a cancellable task.
//!
//! ```text
//! Idle -start-> Running -stop-> AwaitingConfirmation -confirm-> Idle   (count-up)
//! Idle -start-> Running -tick..0-> Completed -acknowledge-> Idle       (count-down)
//!                       -stop-> Idle                                   (count-down)
//! ```

mod runner;
mod session;

pub use runner::ChallengeRunner;
pub use session::{ChallengeSession, ChallengeSnapshot, MAX_COUNTDOWN_SECS};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::Event;
use crate::storage::{KeyValueStore, PreferenceStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeMode {
    /// Stopwatch; the user confirms success when they stop it.
    #[default]
    CountUp,
    /// Countdown from a user-chosen duration; reaching zero is success.
    CountDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeState {
    Idle,
    Running,
    AwaitingConfirmation,
    Completed,
}

/// Apply a `ChallengeFinished` event's candidate time to the stored personal
/// best. Returns `BestRecorded` when the candidate became the new best.
pub fn commit_candidate<S: KeyValueStore>(
    prefs: &PreferenceStore<S>,
    finished: &Event,
) -> Result<Option<Event>> {
    let Event::ChallengeFinished {
        drink_id,
        candidate_secs: Some(seconds),
        ..
    } = finished
    else {
        return Ok(None);
    };
    let previous = prefs.best(drink_id);
    if !prefs.record_best(drink_id, *seconds)? {
        return Ok(None);
    }
    Ok(Some(Event::BestRecorded {
        drink_id: drink_id.clone(),
        seconds: *seconds,
        previous,
        at: Utc::now(),
    }))
}

/// `MM:SS`; minutes are not capped at 59.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
