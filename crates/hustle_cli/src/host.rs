//! Line-oriented terminal host.
//!
//! The host is the presentation and audio collaborator: it turns typed
//! lines into controller commands, draws the table from snapshots, and
//! renders each [`GameEvent`] as it arrives. Sound cues are logged rather
//! than played.

use hustle_core::{
    CommandStatus, GameController, GameEvent, GamePhase, GameState, LOSS_PENALTY, RoundOutcome,
    STARTING_BALANCE, Slot, WIN_REWARD,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, instrument, warn};

/// Wording used to describe the table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Briefcases hiding contraband.
    #[default]
    Vice,
    /// Coconut shells hiding a pearl.
    Coconut,
}

impl Theme {
    /// Name of one container.
    pub fn container(self) -> &'static str {
        match self {
            Theme::Vice => "briefcase",
            Theme::Coconut => "shell",
        }
    }

    /// Name of the hidden token.
    pub fn token(self) -> &'static str {
        match self {
            Theme::Vice => "contraband",
            Theme::Coconut => "pearl",
        }
    }
}

/// A command typed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Start a round (or the next deal).
    Start,
    /// Shuffle the containers.
    Shuffle,
    /// Guess a slot by its raw number, checked when executed.
    Guess(i64),
    /// Bail out: reset cash and score.
    Reset,
    /// Draw the table.
    State,
    /// Print the snapshot as JSON.
    Json,
    /// List commands.
    Help,
    /// Leave the session.
    Quit,
}

impl FromStr for PlayerCommand {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(head) = words.next() else {
            return Err(InputError::Empty);
        };

        let command = match head.to_lowercase().as_str() {
            "start" | "deal" | "s" => PlayerCommand::Start,
            "shuffle" | "x" => PlayerCommand::Shuffle,
            "reset" | "bail" => PlayerCommand::Reset,
            "state" | "table" => PlayerCommand::State,
            "json" => PlayerCommand::Json,
            "help" | "?" => PlayerCommand::Help,
            "quit" | "exit" | "q" => PlayerCommand::Quit,
            "guess" | "pick" | "g" => {
                let arg = words.next().ok_or(InputError::MissingSlot)?;
                PlayerCommand::Guess(parse_number(arg)?)
            }
            other => match other.parse::<i64>() {
                Ok(n) => PlayerCommand::Guess(n),
                Err(_) => return Err(InputError::Unknown(other.to_string())),
            },
        };
        Ok(command)
    }
}

fn parse_number(arg: &str) -> Result<i64, InputError> {
    arg.parse::<i64>()
        .map_err(|_| InputError::NotANumber(arg.to_string()))
}

/// Player input that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum InputError {
    /// Blank line.
    #[display("Type a command, or `help`")]
    Empty,
    /// Unrecognized command word.
    #[display("Unknown command `{}`; type `help`", _0)]
    Unknown(String),
    /// `guess` without a slot.
    #[display("Which one? Try `guess 2`")]
    MissingSlot,
    /// Slot argument that is not a number.
    #[display("`{}` is not a slot number", _0)]
    NotANumber(String),
}

impl std::error::Error for InputError {}

/// Command reference shown by `help`.
pub const HELP: &str = "\
Commands:
  start | deal        start a round (next deal after a result)
  shuffle             shuffle the table
  guess N | N         pick slot N (1-3)
  reset | bail        bail out: cash and score back to the start
  state               show the table
  json                print the game state as JSON
  help                this list
  quit                leave";

/// Payout summary shown by `hustle rules`.
pub fn rules_text(theme: Theme) -> String {
    format!(
        "The {token} is hidden in one of three {container}s. Watch where it goes, shuffle,\n\
         then pick a {container}.\n\
         The table marks the {token} (*) only until the first shuffle of a round.\n\
         \n\
         Starting cash: ${STARTING_BALANCE}\n\
         Right pick:    +${WIN_REWARD}\n\
         Wrong pick:    -${LOSS_PENALTY} (cash never drops below $0)\n",
        token = theme.token(),
        container = theme.container(),
    )
}

/// Draws the three slots plus score and cash.
pub fn render_table(state: &GameState, theme: Theme) -> String {
    let slots: Vec<String> = Slot::ALL
        .iter()
        .map(|&slot| render_slot(state, slot))
        .collect();

    let mut out = format!("  {}\n", slots.join("  "));
    if let Some(selected) = state.selected() {
        out.push_str(&format!("  You picked {} {}.\n", theme.container(), selected));
    }
    out.push_str(&format!(
        "  Score: {}   Cash: ${}   ({})",
        state.score(),
        state.balance(),
        state.phase()
    ));
    out
}

fn render_slot(state: &GameState, slot: Slot) -> String {
    let mark = match state.phase() {
        GamePhase::Shuffling => "~".to_string(),
        GamePhase::Resolved if state.is_slot_revealed(slot) => {
            let mark = if state.token() == slot { "*" } else { "x" };
            mark.to_string()
        }
        GamePhase::Ready if state.shuffles() == 0 && state.visible_token() == Some(slot) => {
            "*".to_string()
        }
        _ => slot.to_string(),
    };
    format!("[ {} ]", mark)
}

/// Describes an event for the player.
pub fn render_event(event: &GameEvent, theme: Theme) -> String {
    match event {
        GameEvent::Started => format!(
            "The {} is in place (*). Shuffle, or pick a {}.",
            theme.token(),
            theme.container()
        ),
        GameEvent::ShuffleStarted => format!("Shuffling the {}s...", theme.container()),
        GameEvent::ShuffleEnded => format!(
            "The {}s settle. Where is the {}? Pick one (1-3).",
            theme.container(),
            theme.token()
        ),
        GameEvent::GuessResolved {
            outcome: RoundOutcome::Win,
            ..
        } => format!("SCORE! +${} You found the {}!", WIN_REWARD, theme.token()),
        GameEvent::GuessResolved {
            outcome: RoundOutcome::Lose,
            token,
            ..
        } => format!(
            "BUSTED! -${} The {} was in {} {}. Better luck next time.",
            LOSS_PENALTY,
            theme.token(),
            theme.container(),
            token
        ),
        GameEvent::Reset => format!("Bailed out. Cash back to ${}.", STARTING_BALANCE),
    }
}

/// Applies one player command and returns the text to show.
#[instrument(skip(controller))]
pub fn execute(controller: &GameController, command: PlayerCommand, theme: Theme) -> String {
    let status = match command {
        PlayerCommand::Start => controller.start(),
        PlayerCommand::Shuffle => controller.shuffle(),
        PlayerCommand::Reset => controller.reset(),
        PlayerCommand::Guess(number) => match controller.guess_number(number) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Rejected slot number");
                return format!("There is no {} {}; pick 1-3.", theme.container(), number);
            }
        },
        PlayerCommand::State => return render_table(&controller.snapshot(), theme),
        PlayerCommand::Json => {
            return serde_json::to_string_pretty(&controller.snapshot())
                .unwrap_or_else(|e| format!("Could not encode state: {}", e));
        }
        PlayerCommand::Help => return HELP.to_string(),
        PlayerCommand::Quit => return String::new(),
    };

    match status {
        CommandStatus::Applied => render_table(&controller.snapshot(), theme),
        CommandStatus::Ignored { phase } => {
            debug!(?command, %phase, "Command not available");
            format!("Can't do that right now ({}).", phase)
        }
    }
}

/// Prints events and logs their sound cues until the channel closes.
async fn render_events(mut events: broadcast::Receiver<GameEvent>, theme: Theme) {
    loop {
        match events.recv().await {
            Ok(event) => {
                for cue in event.sound_cues() {
                    info!(%cue, "Playing sound");
                }
                println!("{}", render_event(&event, theme));
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event renderer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Runs an interactive session on stdin/stdout until `quit` or end of input.
#[instrument(skip(controller))]
pub async fn run_session(controller: GameController, theme: Theme) -> anyhow::Result<()> {
    info!("Starting terminal session");
    let renderer = tokio::spawn(render_events(controller.subscribe(), theme));

    println!("{}", rules_text(theme));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.parse::<PlayerCommand>() {
            Ok(PlayerCommand::Quit) => break,
            Ok(command) => println!("{}", execute(&controller, command, theme)),
            Err(e) => println!("{}", e),
        }
    }

    let final_state = controller.snapshot();
    info!(
        balance = final_state.balance(),
        wins = final_state.score().wins,
        losses = final_state.score().losses,
        "Session over"
    );
    drop(controller);
    renderer.abort();
    println!("You walk away with ${}.", final_state.balance());
    Ok(())
}
