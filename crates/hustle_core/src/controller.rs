//! The game controller: owns the state, validates commands, and runs the
//! shuffle settle timer.
//!
//! Every command runs to completion synchronously. The one suspension point
//! is the shuffle's settle delay, which lives in a spawned Tokio task. The
//! controller holds that task's handle together with a ticket number;
//! `reset` and drop abort the task and retire the ticket, so a callback that
//! still manages to run finds its ticket stale and leaves the state alone.

use crate::dealer::{RandomDealer, TokenDealer};
use crate::events::GameEvent;
use crate::invariants::assert_invariants;
use crate::{GamePhase, GameState, Slot, SlotError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Default time between a shuffle starting and the token being re-rolled.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Whether a command changed the game.
///
/// Commands issued in the wrong phase are ignored rather than rejected: they
/// stand for a disabled button, not a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command was applied.
    Applied,
    /// The command was not valid in this phase; nothing changed.
    Ignored {
        /// Phase the game was in when the command arrived.
        phase: GamePhase,
    },
}

impl CommandStatus {
    /// Returns true if the command was applied.
    pub fn is_applied(self) -> bool {
        matches!(self, CommandStatus::Applied)
    }
}

/// Outstanding settle timer.
#[derive(Debug)]
struct PendingShuffle {
    ticket: u64,
    handle: JoinHandle<()>,
}

/// Everything the controller and its timer task share.
struct Table {
    state: GameState,
    dealer: Box<dyn TokenDealer>,
    pending: Option<PendingShuffle>,
    next_ticket: u64,
}

impl Table {
    /// Aborts and forgets any outstanding settle timer.
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(ticket = pending.ticket, "Cancelling pending shuffle");
            pending.handle.abort();
        }
    }
}

/// Owns the game state and exposes the four player commands.
///
/// ```no_run
/// use hustle_core::{GameController, GameEvent, Slot};
///
/// # async fn example() {
/// let controller = GameController::new();
/// let mut events = controller.subscribe();
///
/// controller.start();
/// controller.shuffle();
/// while let Ok(event) = events.recv().await {
///     if event == GameEvent::ShuffleEnded {
///         break;
///     }
/// }
/// controller.guess(Slot::Two);
/// println!("balance: {}", controller.snapshot().balance());
/// # }
/// ```
pub struct GameController {
    table: Arc<Mutex<Table>>,
    events: broadcast::Sender<GameEvent>,
    settle_delay: Duration,
}

impl GameController {
    /// Creates a controller dealing from the OS-seeded RNG with the default settle delay.
    #[instrument]
    pub fn new() -> Self {
        Self::with_dealer(RandomDealer::from_os_rng(), DEFAULT_SETTLE_DELAY)
    }

    /// Creates a controller with an explicit dealer and settle delay.
    #[instrument(skip(dealer))]
    pub fn with_dealer(dealer: impl TokenDealer, settle_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            table: Arc::new(Mutex::new(Table {
                state: GameState::new(),
                dealer: Box::new(dealer),
                pending: None,
                next_ticket: 0,
            })),
            events,
            settle_delay,
        }
    }

    /// Subscribes to game events.
    ///
    /// Only events emitted after the call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.lock().state.clone()
    }

    /// Returns the configured settle delay.
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Returns true while a shuffle is waiting to settle.
    pub fn is_shuffle_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Starts a round: places the token and clears the previous guess.
    ///
    /// Accepted from `Intro` and `Resolved`. Score and balance carry over.
    #[instrument(skip(self))]
    pub fn start(&self) -> CommandStatus {
        let mut table = self.lock();
        let phase = table.state.phase();
        if !matches!(phase, GamePhase::Intro | GamePhase::Resolved) {
            debug!(%phase, "Ignoring start");
            return CommandStatus::Ignored { phase };
        }

        let token = table.dealer.deal();
        table.state.begin_round(token);
        assert_invariants(&table.state);
        info!("Round started");
        self.emit(GameEvent::Started);
        CommandStatus::Applied
    }

    /// Begins a shuffle; the token is re-rolled once the settle delay elapses.
    ///
    /// Accepted only from `Ready`, so at most one settle timer exists. The
    /// timer runs on the current Tokio runtime; without one the shuffle is
    /// ignored and the round stays `Ready`.
    #[instrument(skip(self))]
    pub fn shuffle(&self) -> CommandStatus {
        let mut table = self.lock();
        let phase = table.state.phase();
        if phase != GamePhase::Ready || table.pending.is_some() {
            debug!(%phase, "Ignoring shuffle");
            return CommandStatus::Ignored { phase };
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%phase, "No Tokio runtime for the settle timer; ignoring shuffle");
            return CommandStatus::Ignored { phase };
        };

        table.state.begin_shuffle();
        let ticket = table.next_ticket;
        table.next_ticket += 1;

        let weak = Arc::downgrade(&self.table);
        let events = self.events.clone();
        let delay = self.settle_delay;
        // The task cannot settle before we release the lock, so it always finds its ticket.
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            settle(&weak, ticket, &events);
        });
        table.pending = Some(PendingShuffle { ticket, handle });

        assert_invariants(&table.state);
        info!(ticket, ?delay, "Shuffle started");
        self.emit(GameEvent::ShuffleStarted);
        CommandStatus::Applied
    }

    /// Guesses which slot holds the token and settles the round.
    ///
    /// Accepted only from `Ready`. A win adds the reward; a loss removes the
    /// penalty, never taking the balance below zero.
    #[instrument(skip(self))]
    pub fn guess(&self, slot: Slot) -> CommandStatus {
        let mut table = self.lock();
        let phase = table.state.phase();
        if phase != GamePhase::Ready {
            debug!(%phase, "Ignoring guess");
            return CommandStatus::Ignored { phase };
        }

        let outcome = table.state.resolve(slot);
        let token = table.state.token();
        assert_invariants(&table.state);
        info!(
            %slot,
            %token,
            %outcome,
            balance = table.state.balance(),
            "Guess resolved"
        );
        self.emit(GameEvent::GuessResolved {
            selected: slot,
            outcome,
            token,
        });
        CommandStatus::Applied
    }

    /// Guesses using a raw slot number.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError`] if `number` is not in `1..=3`. The state is untouched.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn guess_number(&self, number: i64) -> Result<CommandStatus, SlotError> {
        let slot = Slot::try_from(number)?;
        Ok(self.guess(slot))
    }

    /// Returns to the intro with a fresh balance and score.
    ///
    /// Valid from any phase. A pending shuffle is cancelled first.
    #[instrument(skip(self))]
    pub fn reset(&self) -> CommandStatus {
        let mut table = self.lock();
        table.cancel_pending();
        table.state = GameState::new();
        assert_invariants(&table.state);
        info!("Game reset");
        self.emit(GameEvent::Reset);
        CommandStatus::Applied
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: GameEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.lock();
        f.debug_struct("GameController")
            .field("state", &table.state)
            .field("pending", &table.pending)
            .field("settle_delay", &self.settle_delay)
            .finish()
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.lock().cancel_pending();
    }
}

/// Timer callback: completes the shuffle if its ticket is still current.
fn settle(table: &Weak<Mutex<Table>>, ticket: u64, events: &broadcast::Sender<GameEvent>) {
    let Some(table) = table.upgrade() else {
        debug!(ticket, "Controller gone; dropping shuffle");
        return;
    };
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);

    if table.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
        debug!(ticket, "Stale shuffle timer; ignoring");
        return;
    }

    // Dropping our own handle just detaches the finishing task.
    table.pending = None;
    let token = table.dealer.deal();
    table.state.settle_shuffle(token);
    assert_invariants(&table.state);
    info!(ticket, "Shuffle settled");
    let _ = events.send(GameEvent::ShuffleEnded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedDealer;

    fn scripted(script: impl IntoIterator<Item = Slot>) -> GameController {
        GameController::with_dealer(ScriptedDealer::new(script), DEFAULT_SETTLE_DELAY)
    }

    #[test]
    fn test_start_only_from_intro_or_resolved() {
        let controller = scripted([Slot::Two]);
        assert!(controller.start().is_applied());
        assert_eq!(
            controller.start(),
            CommandStatus::Ignored {
                phase: GamePhase::Ready
            }
        );

        controller.guess(Slot::One);
        assert!(controller.start().is_applied());
    }

    #[test]
    fn test_guess_number_rejects_out_of_range() {
        let controller = scripted([Slot::Two]);
        controller.start();
        let before = controller.snapshot();

        let err = controller.guess_number(4).unwrap_err();
        assert_eq!(err.input, "4");
        assert_eq!(controller.snapshot(), before);

        let err = controller.guess_number(-300).unwrap_err();
        assert_eq!(err.input, "-300");
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn test_events_follow_commands() {
        let controller = scripted([Slot::Three]);
        let mut events = controller.subscribe();

        controller.start();
        controller.guess(Slot::Three);
        controller.reset();

        assert_eq!(events.try_recv(), Ok(GameEvent::Started));
        assert_eq!(
            events.try_recv(),
            Ok(GameEvent::GuessResolved {
                selected: Slot::Three,
                outcome: crate::RoundOutcome::Win,
                token: Slot::Three,
            })
        );
        assert_eq!(events.try_recv(), Ok(GameEvent::Reset));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_shuffle() {
        let controller = scripted([Slot::One]);
        let mut events = controller.subscribe();
        controller.start();
        controller.shuffle();
        drop(controller);

        tokio::time::sleep(DEFAULT_SETTLE_DELAY * 2).await;
        assert_eq!(events.try_recv(), Ok(GameEvent::Started));
        assert_eq!(events.try_recv(), Ok(GameEvent::ShuffleStarted));
        assert!(events.try_recv().is_err());
    }
}
