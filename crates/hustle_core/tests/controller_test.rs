//! Tests for round resolution, scoring, and phase guards.

use hustle_core::{
    CommandStatus, DEFAULT_SETTLE_DELAY, GameController, GamePhase, LOSS_PENALTY, RandomDealer,
    RoundOutcome, STARTING_BALANCE, ScriptedDealer, Score, Slot, WIN_REWARD, check_invariants,
};

fn scripted(script: impl IntoIterator<Item = Slot>) -> GameController {
    GameController::with_dealer(ScriptedDealer::new(script), DEFAULT_SETTLE_DELAY)
}

#[test]
fn test_play_again_keeps_score_and_balance() {
    let controller = scripted([Slot::Two, Slot::Three]);
    controller.reset();
    controller.start();

    let state = controller.snapshot();
    assert_eq!(state.phase(), GamePhase::Ready);
    assert_eq!(state.score(), Score::default());
    assert_eq!(state.balance(), STARTING_BALANCE);

    controller.guess(state.token());
    let state = controller.snapshot();
    assert_eq!(state.phase(), GamePhase::Resolved);
    assert_eq!(state.outcome(), Some(RoundOutcome::Win));
    assert_eq!(state.balance(), 1500);
    assert_eq!(state.score(), Score { wins: 1, losses: 0 });

    controller.start();
    let state = controller.snapshot();
    assert_eq!(state.phase(), GamePhase::Ready);
    assert_eq!(state.selected(), None);
    assert_eq!(state.outcome(), None);
    assert_eq!(state.score(), Score { wins: 1, losses: 0 });
    assert_eq!(state.balance(), 1500);
}

#[test]
fn test_wrong_guess_costs_penalty() {
    let controller = scripted([Slot::Two]);
    controller.start();
    assert_eq!(controller.snapshot().token(), Slot::Two);

    controller.guess(Slot::One);
    let state = controller.snapshot();
    assert_eq!(state.outcome(), Some(RoundOutcome::Lose));
    assert_eq!(state.selected(), Some(Slot::One));
    assert_eq!(state.balance(), STARTING_BALANCE - LOSS_PENALTY);
    assert_eq!(state.score().losses, 1);
    // The real position stays available for the reveal.
    assert_eq!(state.visible_token(), Some(Slot::Two));
}

#[test]
fn test_balance_never_goes_negative() {
    let controller = scripted([Slot::Three]);
    for _ in 0..10 {
        controller.start();
        controller.guess(Slot::One);
    }
    let state = controller.snapshot();
    assert_eq!(state.balance(), 0);
    assert_eq!(state.score().losses, 10);

    controller.start();
    controller.guess(Slot::Three);
    assert_eq!(controller.snapshot().balance(), WIN_REWARD);
}

#[test]
fn test_guess_ignored_outside_ready() {
    let controller = scripted([Slot::One]);

    let before = controller.snapshot();
    assert_eq!(
        controller.guess(Slot::One),
        CommandStatus::Ignored {
            phase: GamePhase::Intro
        }
    );
    assert_eq!(controller.snapshot(), before);

    controller.start();
    controller.guess(Slot::Two);
    let before = controller.snapshot();
    assert!(!controller.guess(Slot::One).is_applied());
    assert_eq!(controller.snapshot(), before);
}

#[test]
fn test_shuffle_ignored_outside_ready() {
    // Ignored shuffles never reach the runtime, so no Tokio context is needed.
    let controller = scripted([Slot::One]);
    let before = controller.snapshot();
    assert!(!controller.shuffle().is_applied());
    assert_eq!(controller.snapshot(), before);

    controller.start();
    controller.guess(Slot::One);
    let before = controller.snapshot();
    assert_eq!(
        controller.shuffle(),
        CommandStatus::Ignored {
            phase: GamePhase::Resolved
        }
    );
    assert_eq!(controller.snapshot(), before);
    assert!(!controller.is_shuffle_pending());
}

#[test]
fn test_shuffle_without_runtime_leaves_round_ready() {
    let controller = scripted([Slot::Two, Slot::Three]);
    controller.start();
    let before = controller.snapshot();

    assert_eq!(
        controller.shuffle(),
        CommandStatus::Ignored {
            phase: GamePhase::Ready
        }
    );
    assert_eq!(controller.snapshot(), before);
    assert!(!controller.is_shuffle_pending());

    // The round is still playable.
    assert!(controller.guess(Slot::Two).is_applied());
    assert_eq!(controller.snapshot().outcome(), Some(RoundOutcome::Win));
    assert!(controller.start().is_applied());
}

#[test]
fn test_reset_restores_defaults_from_resolved() {
    let controller = scripted([Slot::Two]);
    controller.start();
    controller.guess(Slot::Two);
    assert!(controller.reset().is_applied());

    let state = controller.snapshot();
    assert_eq!(state.phase(), GamePhase::Intro);
    assert_eq!(state.selected(), None);
    assert_eq!(state.outcome(), None);
    assert_eq!(state.score(), Score::default());
    assert_eq!(state.balance(), STARTING_BALANCE);
}

#[test]
fn test_invalid_slot_number_fails_loudly() {
    let controller = scripted([Slot::One]);
    controller.start();

    assert!(controller.guess_number(0).is_err());
    assert!(controller.guess_number(7).is_err());
    assert_eq!(controller.guess_number(256).unwrap_err().input, "256");
    assert_eq!(controller.guess_number(-1).unwrap_err().input, "-1");
    assert_eq!(controller.snapshot().phase(), GamePhase::Ready);

    assert_eq!(controller.guess_number(1), Ok(CommandStatus::Applied));
}

#[test]
fn test_random_sessions_keep_invariants() {
    let controller = GameController::with_dealer(RandomDealer::seeded(2024), DEFAULT_SETTLE_DELAY);
    let mut rounds = 0;

    for round in 0..200u32 {
        controller.start();
        let slot = Slot::ALL[(round % 3) as usize];
        if controller.guess(slot).is_applied() {
            rounds += 1;
        }
        let state = controller.snapshot();
        assert!(check_invariants(&state).is_ok());
        assert_eq!(state.score().rounds(), rounds);

        if round % 50 == 49 {
            controller.reset();
            rounds = 0;
        }
    }
}
