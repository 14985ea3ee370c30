/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt::Write as _,
    io::{BufRead, Write},
    ops::ControlFlow,
};

use anyhow::{bail, Context, Result};

use crate::{
    perft, splitperft, Board, BoardView, Color, GameCommand, GameStatus, Position,
    LAYOUT_STARTPOS,
};

/// Escape sequence that homes the cursor and clears the terminal.
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Deepest `perft` the game loop will run.
const MAX_PERFT_DEPTH: usize = 5;

/// Text shown by the `help` command.
const HELP: &str = "\
Commands:
- Enter moves in the format: e2-e4
- 'moves [square]' to list legal moves
- 'undo' to take back the last move
- 'history' to list the moves played so far
- 'display' to redraw the board
- 'perft <depth>' to count reachable positions (depth 5 at most)
- 'quit' to end the game
- 'help' to show this help message";

/// Settings for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Draw pieces as letters rather than Unicode glyphs.
    pub ascii: bool,

    /// Clear the terminal before drawing each turn.
    pub clear: bool,

    /// Piece layout the game starts from.
    pub layout: String,

    /// Side to move first.
    pub turn: Color,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ascii: false,
            clear: true,
            layout: LAYOUT_STARTPOS.to_string(),
            turn: Color::White,
        }
    }
}

/// A game between two players taking turns at one terminal.
///
/// The session owns the board and the side to move. Each turn it draws the board,
/// reports check, checkmate, or stalemate, and reads one line of input.
#[derive(Debug, Clone)]
pub struct Session {
    /// The game being played.
    board: Board,

    /// Whose turn it is.
    turn: Color,

    /// Side that moved first, for numbering the move history.
    first: Color,

    /// Message to show once, the next time the board is drawn.
    notice: Option<String>,

    config: SessionConfig,
}

impl Session {
    /// Sets up a new session from the provided settings.
    ///
    /// Fails if the layout cannot be parsed, or if the side that is not to move is
    /// already in check, since its King could then be captured.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let board = Board::from_layout(&config.layout)
            .with_context(|| format!("Failed to set up a board from layout {:?}", config.layout))?;

        if board.is_in_check(config.turn.opponent()) {
            bail!(
                "Invalid starting position: {} is to move, but {} is already in check",
                config.turn,
                config.turn.opponent()
            );
        }

        Ok(Self {
            board,
            turn: config.turn,
            first: config.turn,
            notice: None,
            config,
        })
    }

    /// The current state of the board.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Execute the game loop, reading commands from `input` and writing everything to `output`.
    ///
    /// Returns once the game ends by checkmate or stalemate, a player quits, or `input` runs out.
    /// Bad input is reported on the next turn and never ends the game; only I/O failures are errors.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        let mut lines = input.lines();

        loop {
            self.draw(&mut output)?;

            match self.board.status(self.turn) {
                GameStatus::Checkmate => {
                    writeln!(output, "\nCheckmate! {} wins!", self.turn.opponent())?;
                    break;
                }

                GameStatus::Stalemate => {
                    writeln!(output, "\nStalemate! The game is a draw.")?;
                    break;
                }

                GameStatus::Check => writeln!(output, "\n{} is in check!", self.turn)?,

                GameStatus::Ongoing => {}
            }

            write!(output, "\n{} to move (example: e2-e4): ", self.turn)?;
            output.flush().context("Failed to flush output")?;

            // For ctrl + d
            let Some(line) = lines.next() else {
                writeln!(output)?;
                break;
            };
            let line = line.context("Failed to read a line of input")?;

            // Ignore empty lines
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.parse::<GameCommand>() {
                Ok(cmd) => {
                    if self.execute(cmd).is_break() {
                        writeln!(output, "Game ended.")?;
                        break;
                    }
                }

                // Keep running, even on error
                Err(e) => self.notice = Some(format!("Error: {e:#}")),
            }
        }

        output.flush().context("Failed to flush output")
    }

    /// Handle the execution of a single [`GameCommand`].
    ///
    /// Breaks if the player asked to end the game.
    pub fn execute(&mut self, cmd: GameCommand) -> ControlFlow<()> {
        match cmd {
            GameCommand::Help => self.notice = Some(HELP.to_string()),

            GameCommand::Quit => return ControlFlow::Break(()),

            GameCommand::Display => {}

            GameCommand::History => self.notice = Some(self.history()),

            GameCommand::Undo => {
                self.notice = Some(match self.board.take_back() {
                    Some(mv) => {
                        self.turn = mv.color();
                        format!("Took back {mv}")
                    }
                    None => String::from("There are no moves to take back"),
                });
            }

            GameCommand::Moves { square } => self.notice = Some(self.moves(square)),

            GameCommand::Perft { depth } => self.notice = Some(self.perft(depth)),

            GameCommand::Move { from, to } => match self.board.play_move(from, to, self.turn) {
                Ok(_) => self.turn = self.turn.opponent(),
                Err(e) => self.notice = Some(format!("Error: {e}")),
            },
        }

        ControlFlow::Continue(())
    }

    /// Draws the move history, the board, and any pending notice.
    fn draw<W: Write>(&mut self, output: &mut W) -> Result<()> {
        if self.config.clear {
            write!(output, "{CLEAR_SCREEN}")?;
        }

        let history = self.numbered_history();
        if !history.is_empty() {
            writeln!(output, "Move History:")?;
            for line in history {
                writeln!(output, "{line}")?;
            }
            writeln!(output)?;
        }

        write!(output, "{}", BoardView::new(&self.board, self.config.ascii))?;

        if let Some(notice) = self.notice.take() {
            writeln!(output, "\n{notice}")?;
        }

        Ok(())
    }

    /// The moves played so far, two per line: `1. e2-e4 e7-e5`.
    fn numbered_history(&self) -> Vec<String> {
        // If Black moved first, White's half of the first line is skipped
        let skipped = self.first.index();
        let mut lines: Vec<String> = Vec::new();

        for (ply, mv) in (skipped..).zip(self.board.history()) {
            if ply % 2 == 0 {
                lines.push(format!("{}. {mv}", ply / 2 + 1));
            } else if let Some(line) = lines.last_mut() {
                _ = write!(line, " {mv}");
            } else {
                lines.push(format!("1. ... {mv}"));
            }
        }

        lines
    }

    /// Every move played so far, along with the piece moved and anything it captured.
    fn history(&self) -> String {
        let moves = self.board.history();
        if moves.is_empty() {
            return String::from("No moves have been played yet");
        }

        moves
            .iter()
            .enumerate()
            .fold(String::new(), |mut acc, (i, mv)| {
                if i > 0 {
                    acc.push('\n');
                }
                _ = write!(acc, "{:>3}. {mv} {}", i + 1, mv.piece.name());
                if let Some(captured) = mv.captured {
                    _ = write!(acc, ", capturing {}", captured.name());
                }
                if mv.is_en_passant() {
                    acc.push_str(" en passant");
                } else if mv.is_castling() {
                    acc.push_str(" (castling)");
                }
                acc
            })
    }

    /// Legal moves for the side to move, or for whatever stands on `square`, sorted.
    fn moves(&mut self, square: Option<Position>) -> String {
        let moves = match square {
            Some(square) => self.board.legal_moves_from(square),
            None => self.board.legal_moves(self.turn),
        };

        // If there are none, print "(none)"
        if moves.is_empty() {
            return String::from("(none)");
        }

        let mut moves = moves.into_iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
        moves.sort();
        moves.join(", ")
    }

    /// Splitperft from the current position, followed by the total.
    fn perft(&mut self, depth: usize) -> String {
        if depth > MAX_PERFT_DEPTH {
            return format!("Error: perft depth {depth} is too deep (at most {MAX_PERFT_DEPTH})");
        }

        let split = splitperft(&mut self.board, self.turn, depth);
        let total = if split.is_empty() {
            perft(&mut self.board, self.turn, depth)
        } else {
            split.iter().map(|(_, nodes)| nodes).sum()
        };

        let mut out = split.iter().fold(String::new(), |mut acc, (mv, nodes)| {
            _ = writeln!(acc, "{mv}: {nodes}");
            acc
        });
        _ = write!(out, "\nNodes searched: {total}");
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn session(layout: &str, turn: Color) -> Session {
        Session::new(SessionConfig {
            ascii: true,
            clear: false,
            layout: layout.to_string(),
            turn,
        })
        .unwrap()
    }

    fn play(session: &mut Session, input: &str) -> String {
        let mut output = Vec::new();
        session.run(input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_rejects_capturable_king() {
        let config = SessionConfig {
            layout: String::from("4k3/8/8/8/8/8/8/4R1K1"),
            turn: Color::White,
            ..Default::default()
        };
        assert!(Session::new(config.clone()).is_err());

        // It's fine if the side in check is the one to move
        let config = SessionConfig {
            turn: Color::Black,
            ..config
        };
        assert!(Session::new(config).is_ok());
    }

    #[test]
    fn test_rejects_bad_layout() {
        let config = SessionConfig {
            layout: String::from("not a layout"),
            ..Default::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_moves_alternate_turns() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "e2-e4\ne7-e5\n");

        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board().move_count(), 2);
        assert!(out.contains("1. e2-e4 e7-e5"));
        assert!(out.contains("White to move (example: e2-e4): "));
        assert!(out.contains("Black to move (example: e2-e4): "));
        assert!(!out.contains(CLEAR_SCREEN));
    }

    #[test]
    fn test_bad_input_is_a_notice() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "e2e4\ne7-e5\ne2-e5\n");

        assert!(out.contains("Error: Invalid move format"));
        assert!(out.contains("Error: it's White's turn, but the black pawn on e7 belongs to Black"));
        assert!(out.contains("Error: invalid move for white pawn: e2 to e5"));
        assert_eq!(game.board().move_count(), 0);
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_undo_returns_the_turn() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "g1-f3\nundo\n");

        assert!(out.contains("Took back g1-f3"));
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board(), &Board::default());

        let out = play(&mut game, "takeback\n");
        assert!(out.contains("There are no moves to take back"));
    }

    #[test]
    fn test_quit_ends_the_game() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "help\nexit\ne2-e4\n");

        assert!(out.contains("- 'quit' to end the game"));
        assert!(out.ends_with("Game ended.\n"));
        assert_eq!(game.board().move_count(), 0);
    }

    #[test]
    fn test_black_moves_first() {
        let mut game = session(LAYOUT_STARTPOS, Color::Black);
        let out = play(&mut game, "e7-e5\ne2-e4\nd7-d5\n");

        assert!(out.contains("1. ... e7-e5"));
        assert!(out.contains("2. e2-e4 d7-d5"));
        assert!(out.starts_with("   a b c d e f g h"));
    }

    #[test]
    fn test_moves_and_perft_commands() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "moves b1\nmoves e4\nperft 2\n");

        assert!(out.contains("b1-a3, b1-c3"));
        assert!(out.contains("(none)"));
        assert!(out.contains("e2-e4: 20"));
        assert!(out.contains("Nodes searched: 400"));
    }

    #[test]
    fn test_check_notice() {
        // Black's Rook on e8 stands on the same file as White's King
        let mut game = session("4r1k1/8/8/8/8/8/8/4K3", Color::White);
        let out = play(&mut game, "");
        assert!(out.contains("White is in check!"));
    }

    #[test]
    fn test_perft_depth_is_capped() {
        let mut game = session(LAYOUT_STARTPOS, Color::White);
        let out = play(&mut game, "perft 40\n");

        assert!(out.contains("Error: perft depth 40 is too deep (at most 5)"));
        assert!(!out.contains("Nodes searched"));
        assert_eq!(game.board(), &Board::default());
    }

    #[test]
    fn test_history_command() {
        let mut game = session("4k3/8/8/3p4/4P3/8/8/4K3", Color::White);
        let out = play(&mut game, "e4-d5\nhistory\n");
        assert!(out.contains("  1. e4-d5 white pawn, capturing black pawn"));
    }

    #[test]
    fn test_stalemate_ends_the_game() {
        let mut game = session("k7/8/8/2Q5/8/8/8/4K3", Color::White);
        let out = play(&mut game, "c5-b6\ne1-e2\n");

        assert!(out.ends_with("Stalemate! The game is a draw.\n"));
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.board().move_count(), 1);
    }
}
