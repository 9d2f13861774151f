use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::challenge::{ChallengeMode, ChallengeState};

/// Every state change in the core produces an Event.
/// Front ends print or render them; the core logs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ChallengeStarted {
        drink_id: String,
        mode: ChallengeMode,
        /// Elapsed seconds (count-up) or remaining seconds (count-down).
        counter_secs: u32,
        at: DateTime<Utc>,
    },
    ChallengeTicked {
        drink_id: String,
        mode: ChallengeMode,
        counter_secs: u32,
        at: DateTime<Utc>,
    },
    /// Count-down reached zero.
    ChallengeCompleted {
        drink_id: String,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// User stopped a running session.
    ChallengeStopped {
        drink_id: String,
        mode: ChallengeMode,
        state: ChallengeState,
        counter_secs: u32,
        at: DateTime<Utc>,
    },
    /// Session returned to idle after a completion or a confirmation prompt.
    /// `candidate_secs` is the time to commit, `None` when discarded.
    ChallengeFinished {
        drink_id: String,
        candidate_secs: Option<u32>,
        at: DateTime<Utc>,
    },
    ChallengeReset {
        drink_id: String,
        at: DateTime<Utc>,
    },
    ModeChanged {
        drink_id: String,
        mode: ChallengeMode,
        at: DateTime<Utc>,
    },
    BestRecorded {
        drink_id: String,
        seconds: u32,
        previous: Option<u32>,
        at: DateTime<Utc>,
    },
    DrinkViewed {
        drink_id: String,
        recent_len: usize,
        at: DateTime<Utc>,
    },
    FavouriteToggled {
        drink_id: String,
        favourite: bool,
        at: DateTime<Utc>,
    },
    CatalogLoaded {
        drinks: usize,
        failed_letters: Vec<char>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Snake-case name of the variant, used as the log message key.
    pub fn name(&self) -> &'static str {
        match self {
            Event::ChallengeStarted { .. } => "challenge_started",
            Event::ChallengeTicked { .. } => "challenge_ticked",
            Event::ChallengeCompleted { .. } => "challenge_completed",
            Event::ChallengeStopped { .. } => "challenge_stopped",
            Event::ChallengeFinished { .. } => "challenge_finished",
            Event::ChallengeReset { .. } => "challenge_reset",
            Event::ModeChanged { .. } => "mode_changed",
            Event::BestRecorded { .. } => "best_recorded",
            Event::DrinkViewed { .. } => "drink_viewed",
            Event::FavouriteToggled { .. } => "favourite_toggled",
            Event::CatalogLoaded { .. } => "catalog_loaded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::FavouriteToggled {
            drink_id: "11007".into(),
            favourite: true,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FavouriteToggled");
        assert_eq!(json["drink_id"], "11007");
        assert_eq!(event.name(), "favourite_toggled");
    }
}
