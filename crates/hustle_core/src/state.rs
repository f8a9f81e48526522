//! Game state record, phases, and payout constants.

use crate::Slot;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Balance every session starts with, and returns to on reset.
pub const STARTING_BALANCE: u64 = 1000;

/// Amount added to the balance when the guess finds the token.
pub const WIN_REWARD: u64 = 500;

/// Amount removed from the balance on a wrong guess (floored at zero).
pub const LOSS_PENALTY: u64 = 200;

/// Phase of the game state machine.
///
/// ```text
/// Intro --start--> Ready --shuffle--> Shuffling --settle--> Ready
/// Ready --guess--> Resolved --start--> Ready
/// (any) --reset--> Intro
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GamePhase {
    /// No round has been started since construction or reset.
    #[default]
    Intro,
    /// Token placed, waiting for a shuffle or a guess.
    Ready,
    /// Shuffle in flight; the token position is about to be re-rolled.
    Shuffling,
    /// A guess has been made and the outcome is visible.
    Resolved,
}

/// Result of a resolved guess.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoundOutcome {
    /// The guessed slot held the token.
    Win,
    /// The guessed slot was empty.
    Lose,
}

impl RoundOutcome {
    /// Returns true for [`RoundOutcome::Win`].
    pub fn is_win(self) -> bool {
        matches!(self, RoundOutcome::Win)
    }
}

/// Win/loss tally since the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
}

impl Score {
    /// Number of rounds resolved since the last reset.
    pub fn rounds(&self) -> u32 {
        self.wins + self.losses
    }

    fn record(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win => self.wins += 1,
            RoundOutcome::Lose => self.losses += 1,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.wins, self.losses)
    }
}

/// Complete game state.
///
/// Owned by [`GameController`](crate::GameController) and handed out to
/// collaborators only as a cloned snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    phase: GamePhase,
    token: Slot,
    selected: Option<Slot>,
    outcome: Option<RoundOutcome>,
    score: Score,
    balance: u64,
    #[serde(default)]
    shuffles: u32,
}

impl GameState {
    /// Creates the construction-time state: intro phase, full balance, empty score.
    #[instrument]
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Intro,
            token: Slot::One,
            selected: None,
            outcome: None,
            score: Score::default(),
            balance: STARTING_BALANCE,
            shuffles: 0,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Returns the slot currently holding the token.
    ///
    /// This is the raw position. Presentation layers should go through
    /// [`GameState::visible_token`] instead.
    pub fn token(&self) -> Slot {
        self.token
    }

    /// Returns the guessed slot, present only once the round is resolved.
    pub fn selected(&self) -> Option<Slot> {
        self.selected
    }

    /// Returns the round outcome, present only once the round is resolved.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    /// Returns the win/loss tally.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Returns the current balance.
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Returns how many shuffles have settled in the current round.
    ///
    /// Hosts that want the player to track the token by eye can show it
    /// only while this is zero.
    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }

    /// Returns the token position if a collaborator may show it.
    ///
    /// Hidden while shuffling, and in the intro where no round has placed a
    /// token yet. Visible in `Ready` (before the guess) and in `Resolved`.
    pub fn visible_token(&self) -> Option<Slot> {
        match self.phase {
            GamePhase::Ready | GamePhase::Resolved => Some(self.token),
            GamePhase::Intro | GamePhase::Shuffling => None,
        }
    }

    /// Returns true if the container at `slot` should be shown open.
    ///
    /// Only after a guess: the chosen slot and the slot with the token.
    pub fn is_slot_revealed(&self, slot: Slot) -> bool {
        self.phase == GamePhase::Resolved
            && (self.selected == Some(slot) || self.token == slot)
    }

    pub(crate) fn begin_round(&mut self, token: Slot) {
        self.phase = GamePhase::Ready;
        self.token = token;
        self.selected = None;
        self.outcome = None;
        self.shuffles = 0;
    }

    pub(crate) fn begin_shuffle(&mut self) {
        self.phase = GamePhase::Shuffling;
    }

    pub(crate) fn settle_shuffle(&mut self, token: Slot) {
        self.phase = GamePhase::Ready;
        self.token = token;
        self.shuffles = self.shuffles.saturating_add(1);
    }

    /// Resolves the guess against the token and applies the payout.
    pub(crate) fn resolve(&mut self, slot: Slot) -> RoundOutcome {
        let outcome = if slot == self.token {
            RoundOutcome::Win
        } else {
            RoundOutcome::Lose
        };

        self.selected = Some(slot);
        self.outcome = Some(outcome);
        self.score.record(outcome);
        self.balance = match outcome {
            RoundOutcome::Win => self.balance.saturating_add(WIN_REWARD),
            RoundOutcome::Lose => self.balance.saturating_sub(LOSS_PENALTY),
        };
        self.phase = GamePhase::Resolved;
        outcome
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
