//! Notifications emitted to presentation and audio collaborators.

use crate::{RoundOutcome, Slot};
use serde::{Deserialize, Serialize};

/// A state change the controller announces after applying a command.
///
/// Events are delivered in the order the state changed. The controller has
/// no knowledge of how they are drawn or played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A round began and the token was placed.
    Started,
    /// The slots started shuffling; the token is hidden.
    ShuffleStarted,
    /// The shuffle settled and the token was re-rolled.
    ShuffleEnded,
    /// A guess was resolved.
    GuessResolved {
        /// The slot the player picked.
        selected: Slot,
        /// Win or lose.
        outcome: RoundOutcome,
        /// Where the token really was, so a loss can reveal it.
        token: Slot,
    },
    /// The game returned to the intro with a fresh balance and score.
    Reset,
}

/// Sound to play for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SoundCue {
    /// A round begins.
    Start,
    /// The slots shuffle.
    Shuffle,
    /// The player picks a slot.
    Select,
    /// The pick found the token.
    Win,
    /// The pick missed.
    Lose,
}

impl GameEvent {
    /// Returns the sound cues for this event, in play order.
    pub fn sound_cues(&self) -> &'static [SoundCue] {
        match self {
            GameEvent::Started => &[SoundCue::Start],
            GameEvent::ShuffleStarted => &[SoundCue::Shuffle],
            GameEvent::GuessResolved {
                outcome: RoundOutcome::Win,
                ..
            } => &[SoundCue::Select, SoundCue::Win],
            GameEvent::GuessResolved {
                outcome: RoundOutcome::Lose,
                ..
            } => &[SoundCue::Select, SoundCue::Lose],
            GameEvent::ShuffleEnded | GameEvent::Reset => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_cues_select_before_result() {
        let event = GameEvent::GuessResolved {
            selected: Slot::One,
            outcome: RoundOutcome::Lose,
            token: Slot::Two,
        };
        assert_eq!(event.sound_cues(), &[SoundCue::Select, SoundCue::Lose]);
    }

    #[test]
    fn test_silent_events() {
        assert!(GameEvent::ShuffleEnded.sound_cues().is_empty());
        assert!(GameEvent::Reset.sound_cues().is_empty());
        assert_eq!(GameEvent::Started.sound_cues(), &[SoundCue::Start]);
    }
}
