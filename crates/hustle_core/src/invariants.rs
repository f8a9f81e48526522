//! State invariants checked after every applied command.

use crate::{GamePhase, GameState, LOSS_PENALTY, RoundOutcome, STARTING_BALANCE, WIN_REWARD};
use tracing::{instrument, warn};

/// A property of the game state that every applied command preserves.
pub trait Invariant<S> {
    /// Returns true if `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// What the property says, for logs and failure messages.
    fn description() -> &'static str;
}

/// An invariant that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// The broken invariant's description.
    pub description: String,
}

impl InvariantViolation {
    /// Records a violation of the invariant described by `description`.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked as a group, reporting every failure rather than the first.
pub trait InvariantSet<S> {
    /// Checks each member invariant against `state`.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn record<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

impl<S, A, B, C> InvariantSet<S> for (A, B, C)
where
    A: Invariant<S>,
    B: Invariant<S>,
    C: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        record::<S, A>(state, &mut violations);
        record::<S, B>(state, &mut violations);
        record::<S, C>(state, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// A selection and an outcome exist exactly when the round is resolved.
pub struct SelectionMatchesPhase;

impl Invariant<GameState> for SelectionMatchesPhase {
    fn holds(state: &GameState) -> bool {
        let resolved = state.phase() == GamePhase::Resolved;
        state.selected().is_some() == resolved && state.outcome().is_some() == resolved
    }

    fn description() -> &'static str {
        "Selection and outcome must be present if and only if the round is resolved"
    }
}

/// A resolved round is a win exactly when the pick matches the token.
pub struct OutcomeMatchesSelection;

impl Invariant<GameState> for OutcomeMatchesSelection {
    fn holds(state: &GameState) -> bool {
        match (state.selected(), state.outcome()) {
            (Some(selected), Some(outcome)) => {
                (outcome == RoundOutcome::Win) == (selected == state.token())
            }
            _ => true,
        }
    }

    fn description() -> &'static str {
        "Outcome must be a win if and only if the selected slot holds the token"
    }
}

/// The balance is explained by the score.
///
/// Every win added exactly the reward and every loss removed at most the
/// penalty (less when the floor at zero cut it short), so the balance lies
/// between `start + wins * reward - losses * penalty` and `start + wins * reward`.
pub struct BalanceMatchesScore;

impl Invariant<GameState> for BalanceMatchesScore {
    fn holds(state: &GameState) -> bool {
        let score = state.score();
        let ceiling =
            i128::from(STARTING_BALANCE) + i128::from(score.wins) * i128::from(WIN_REWARD);
        let floor = ceiling - i128::from(score.losses) * i128::from(LOSS_PENALTY);
        let balance = i128::from(state.balance());
        floor <= balance && balance <= ceiling
    }

    fn description() -> &'static str {
        "Balance must equal the starting cash plus rewards minus penalties, floored at zero"
    }
}

/// Every invariant the controller maintains.
pub type GameInvariants = (
    SelectionMatchesPhase,
    OutcomeMatchesSelection,
    BalanceMatchesScore,
);

/// Checks all game invariants.
///
/// # Errors
///
/// Returns every violated invariant.
#[instrument(skip(state))]
pub fn check_invariants(state: &GameState) -> Result<(), Vec<InvariantViolation>> {
    GameInvariants::check_all(state).inspect_err(|violations| {
        for violation in violations {
            warn!(description = %violation.description, "Invariant violated");
        }
    })
}

/// Asserts that all game invariants hold (panics on violation in debug builds).
pub fn assert_invariants(state: &GameState) {
    debug_assert!(
        check_invariants(state).is_ok(),
        "Game invariants violated: {:?}",
        state
    );
}
