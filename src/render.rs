/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, Position};

/// A printable view of a [`Board`], with rank and file labels on every side.
///
/// Pieces are drawn with their Unicode glyphs, or with their FEN letters if `ascii` is set,
/// for terminals without chess glyphs. Empty squares are drawn as `.`.
///
/// # Example
/// ```
/// # use rookery::{Board, BoardView};
/// let board = Board::default();
/// let view = BoardView::new(&board, true).to_string();
/// assert!(view.contains("8| r n b q k b n r |8"));
/// assert!(view.contains("1| R N B Q K B N R |1"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    board: &'a Board,
    ascii: bool,
}

impl<'a> BoardView<'a> {
    /// Creates a new view of `board`.
    #[inline(always)]
    pub const fn new(board: &'a Board, ascii: bool) -> Self {
        Self { board, ascii }
    }

    /// Writes the file labels and a horizontal rule.
    fn files(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..Position::SIZE {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        writeln!(f)
    }

    fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  +")?;
        for _ in 0..Position::SIZE {
            write!(f, "--")?;
        }
        writeln!(f, "-+")
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::files(f)?;
        Self::rule(f)?;

        for row in 0..Position::SIZE {
            let rank = Position::SIZE - row;
            write!(f, "{rank}|")?;
            for col in 0..Position::SIZE {
                let symbol = match self.board.piece_at(Position::new(row, col)) {
                    Some(piece) if self.ascii => piece.char(),
                    Some(piece) => piece.glyph(),
                    None => '.',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f, " |{rank}")?;
        }

        Self::rule(f)?;
        Self::files(f)
    }
}
