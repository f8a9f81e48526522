//! Contraband hustle - find the token hidden under one of three slots.
//!
//! This crate is the game state machine and nothing else. Rendering,
//! animation, and sound live with the host, which drives a
//! [`GameController`] through four commands and listens for
//! [`GameEvent`]s.
//!
//! # Architecture
//!
//! - **Slot**: the three fixed positions, with checked conversion from raw numbers
//! - **State**: phase, token, selection, outcome, score, and balance
//! - **Dealer**: injectable source of token positions
//! - **Controller**: command validation, payouts, and the cancellable shuffle timer
//! - **Invariants**: properties asserted after every applied command
//!
//! # Example
//!
//! ```
//! use hustle_core::{GameController, GamePhase, ScriptedDealer, Slot, DEFAULT_SETTLE_DELAY};
//!
//! let controller =
//!     GameController::with_dealer(ScriptedDealer::new([Slot::Two]), DEFAULT_SETTLE_DELAY);
//! controller.start();
//! controller.guess(Slot::Two);
//!
//! let state = controller.snapshot();
//! assert_eq!(state.phase(), GamePhase::Resolved);
//! assert_eq!(state.balance(), 1500);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod controller;
mod dealer;
mod events;
mod invariants;
mod slot;
mod state;

pub use controller::{CommandStatus, DEFAULT_SETTLE_DELAY, GameController};
pub use dealer::{RandomDealer, ScriptedDealer, TokenDealer};
pub use events::{GameEvent, SoundCue};
pub use invariants::{
    BalanceMatchesScore, GameInvariants, Invariant, InvariantSet, InvariantViolation,
    OutcomeMatchesSelection, SelectionMatchesPhase, check_invariants,
};
pub use slot::{Slot, SlotError};
pub use state::{
    GamePhase, GameState, LOSS_PENALTY, RoundOutcome, STARTING_BALANCE, Score, WIN_REWARD,
};
