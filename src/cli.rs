/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use anyhow::anyhow;
use clap::{CommandFactory, Parser};

use crate::{parse_move, Color, Position, SessionConfig, LAYOUT_STARTPOS};

/// Play a game of chess between two players sharing a terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Draw pieces as letters (`K`, `q`, ...) instead of Unicode chess glyphs.
    #[arg(short, long, default_value = "false")]
    pub ascii: bool,

    /// Do not clear the screen before drawing each turn.
    #[arg(long, default_value = "false")]
    pub no_clear: bool,

    /// Piece layout to start from, as the placement field of a FEN string.
    #[arg(short, long, default_value = LAYOUT_STARTPOS)]
    pub layout: String,

    /// The side that moves first.
    #[arg(short, long, default_value = "white")]
    pub turn: Color,
}

impl Cli {
    /// Converts the parsed flags into the settings of a game session.
    pub fn config(self) -> SessionConfig {
        SessionConfig {
            ascii: self.ascii,
            clear: !self.no_clear,
            layout: self.layout,
            turn: self.turn,
        }
    }
}

/// A command entered at the prompt during a game.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    multicall = true,
    rename_all = "lower",
    disable_help_subcommand = true,
    override_usage("<COMMAND> | <MOVE>")
)]
pub enum GameCommand {
    /// Show the available commands.
    Help,

    /// End the game.
    #[command(alias = "exit")]
    Quit,

    /// Redraw the board.
    #[command(alias = "d")]
    Display,

    /// List every move played so far, with the pieces involved.
    History,

    /// Take back the last move played, returning the turn to the side that made it.
    #[command(alias = "takeback")]
    Undo,

    /// Shows all legal moves for the side to move, or for the piece on a specific square.
    Moves { square: Option<Position> },

    /// Counts the positions reachable from the current one in exactly `depth` moves.
    Perft { depth: usize },

    /// Move the piece on `from` to `to`, written like `e2-e4`.
    #[command(skip)]
    Move { from: Position, to: Position },
}

impl FromStr for GameCommand {
    type Err = anyhow::Error;
    /// Attempt to parse a [`GameCommand`] from a string.
    ///
    /// Anything that is not a known command word is parsed as a move.
    ///
    /// # Example
    /// ```
    /// # use rookery::{GameCommand, Position};
    /// assert_eq!("d".parse::<GameCommand>().unwrap(), GameCommand::Display);
    /// assert_eq!(
    ///     "e2-e4".parse::<GameCommand>().unwrap(),
    ///     GameCommand::Move { from: Position::new(6, 4), to: Position::new(4, 4) }
    /// );
    /// assert!("e2e4".parse::<GameCommand>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = s.split_ascii_whitespace().collect::<Vec<_>>();

        match Self::try_parse_from(words.iter().copied()) {
            Ok(cmd) => Ok(cmd),

            // A known command with bad arguments should report its own usage
            Err(e) if is_command_word(words.first().copied()) => Err(anyhow!("{e}")),

            // Otherwise, it's probably meant to be a move
            Err(_) => {
                let (from, to) = parse_move(s)?;
                Ok(Self::Move { from, to })
            }
        }
    }
}

/// Returns `true` if `word` names one of the [`GameCommand`]s or their aliases.
fn is_command_word(word: Option<&str>) -> bool {
    word.is_some_and(|word| GameCommand::command().find_subcommand(word).is_some())
}
