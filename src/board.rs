/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use super::{Color, Move, Piece, PieceKind, Position, LAYOUT_STARTPOS};

/// An `8x8` chessboard and everything needed to judge and reverse moves on it.
///
/// The grid holds at most one [`Piece`] per square. Alongside it, the board keeps:
/// * the history of moves made, whose most recent entry decides en passant eligibility,
/// * the location of each King, so check detection never has to scan for them.
///
/// All mutation goes through [`Board::make_move`] and [`Board::unmake_move`].
/// Exploratory moves should use [`Board::with_move_made`], which always reverts.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    /// Row-major grid, indexed by [`Position::index`].
    cells: [Option<Piece>; Position::COUNT],

    /// Every move made on this board, oldest first.
    history: Vec<Move>,

    /// Cached King squares, indexed by [`Color::index`].
    kings: [Position; Color::COUNT],
}

impl Board {
    /// Creates a [`Board`] from the piece-placement field of a FEN string.
    ///
    /// Ranks are listed from 8 down to 1, separated by `/`. Digits denote runs of empty squares.
    /// Exactly one King per color is required.
    ///
    /// Whether a piece has moved is inferred from where it stands:
    /// Pawns on their starting row, Kings on e1/e8 and Rooks in the corners are unmoved.
    ///
    /// # Example
    /// ```
    /// # use rookery::{Board, Color, Position};
    /// let board = Board::from_layout("4k3/8/8/8/8/8/8/4K2R").unwrap();
    /// assert_eq!(board.king_square(Color::White), Position::new(7, 4));
    /// assert!(Board::from_layout("8/8/8/8/8/8/8/4K3").is_err());
    /// ```
    pub fn from_layout(layout: &str) -> Result<Self> {
        let layout = layout.trim();
        let mut cells = [None; Position::COUNT];
        let mut kings: [Option<Position>; Color::COUNT] = [None; Color::COUNT];

        let ranks = layout.split('/').collect::<Vec<_>>();
        if ranks.len() != 8 {
            bail!(
                "Layout must have piece placements for all 8 ranks. Got {} in {layout:?}",
                ranks.len()
            );
        }

        for (row, rank) in ranks.into_iter().enumerate() {
            let row = row as i8;
            let mut col: i8 = 0;

            for c in rank.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if !(1..=8).contains(&empty) {
                        bail!("Invalid run of {empty} empty squares in layout {layout:?}: must be between 1 and 8");
                    }
                    if col + empty as i8 > Position::SIZE {
                        bail!("Rank {} of layout {layout:?} has more than 8 files", 8 - row);
                    }
                    col += empty as i8;
                    continue;
                }

                let square = Position::new(row, col);
                if !square.is_on_board() {
                    bail!("Rank {} of layout {layout:?} has more than 8 files", 8 - row);
                }

                let piece = Piece::from_char(c)
                    .with_context(|| format!("Invalid piece in layout {layout:?}"))?;

                if piece.is_king() {
                    let slot = &mut kings[piece.color().index()];
                    if slot.is_some() {
                        bail!("Layout {layout:?} has more than one {} king", piece.color());
                    }
                    *slot = Some(square);
                }

                cells[square.index()] = Some(piece.with_moved(!is_home_square(piece, square)));
                col += 1;
            }

            if col != Position::SIZE {
                bail!(
                    "Rank {} of layout {layout:?} covers {col} files instead of 8",
                    8 - row
                );
            }
        }

        let king = |color: Color| {
            kings[color.index()].ok_or(anyhow!("Layout {layout:?} has no {color} king"))
        };

        Ok(Self {
            cells,
            history: Vec::new(),
            kings: [king(Color::White)?, king(Color::Black)?],
        })
    }

    /// Fetches the piece on `square`, if there is one.
    ///
    /// Squares off the board are always empty.
    #[inline(always)]
    pub fn piece_at(&self, square: Position) -> Option<Piece> {
        if square.is_on_board() {
            self.cells[square.index()]
        } else {
            None
        }
    }

    /// Returns `true` if there is no piece on `square`.
    #[inline(always)]
    pub fn is_empty(&self, square: Position) -> bool {
        self.piece_at(square).is_none()
    }

    /// An iterator over every square and its contents, row by row starting at a8.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<Piece>)> + '_ {
        Position::iter().map(|square| (square, self.cells[square.index()]))
    }

    /// An iterator over every piece of `color` and the square it stands on.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells().filter_map(move |(square, piece)| {
            piece
                .filter(|piece| piece.color() == color)
                .map(|piece| (square, piece))
        })
    }

    /// The square holding `color`'s King.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Position {
        self.kings[color.index()]
    }

    /// The most recently made move, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    /// All moves made on this board, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves (plies) made on this board.
    #[inline(always)]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Applies the provided [`Move`]. No enforcement of legality.
    ///
    /// Besides relocating the piece, this also:
    /// * marks the piece as moved,
    /// * relocates the Rook when castling, and marks it as moved,
    /// * removes the captured Pawn from beside the destination for en passant,
    /// * updates the cached King square,
    /// * records the move as the last move.
    pub fn make_move(&mut self, mv: Move) {
        if let Some((rook_from, rook_to)) = mv.rook_squares() {
            if let Some(rook) = self.take(rook_from) {
                self.put(rook_to, rook.with_moved(true));
            }
        }

        if mv.is_en_passant() {
            self.take(mv.capture_square());
        }

        self.take(mv.from);
        self.put(mv.to, mv.piece.with_moved(true));

        if mv.piece.is_king() {
            self.kings[mv.color().index()] = mv.to;
        }

        self.history.push(mv);
    }

    /// Reverses `mv`, which must be the most recently made move.
    ///
    /// The moving piece returns to its source with the `has_moved` flag it had before the move,
    /// so this restores the board exactly as it was, including the previous last move.
    pub fn unmake_move(&mut self, mv: Move) {
        let last = self.history.pop();
        debug_assert_eq!(last, Some(mv), "can only unmake the most recent move");

        self.take(mv.to);
        self.put(mv.from, mv.piece);

        if let Some(captured) = mv.captured {
            self.put(mv.capture_square(), captured);
        }

        if let Some((rook_from, rook_to)) = mv.rook_squares() {
            if let Some(rook) = self.take(rook_to) {
                self.put(rook_from, rook.with_moved(false));
            }
        }

        if mv.piece.is_king() {
            self.kings[mv.color().index()] = mv.from;
        }
    }

    /// Reverses the most recently made move, returning it.
    pub fn take_back(&mut self) -> Option<Move> {
        let mv = *self.last_move()?;
        self.unmake_move(mv);
        Some(mv)
    }

    /// Makes `mv`, inspects the resulting board with `f`, then unmakes `mv`.
    ///
    /// `f` only receives a shared reference, so the board is guaranteed to be
    /// returned to its exact prior state once this returns.
    pub fn with_move_made<T>(&mut self, mv: Move, f: impl FnOnce(&Self) -> T) -> T {
        self.make_move(mv);
        let result = f(self);
        self.unmake_move(mv);
        result
    }

    /// Removes and returns the piece on `square`.
    #[inline(always)]
    fn take(&mut self, square: Position) -> Option<Piece> {
        self.cells[square.index()].take()
    }

    /// Places `piece` on `square`, replacing whatever was there.
    #[inline(always)]
    fn put(&mut self, square: Position, piece: Piece) {
        self.cells[square.index()] = Some(piece);
    }
}

/// Returns `true` if `square` is where `piece` starts the game, meaning it cannot have moved yet.
///
/// Only Pawns, Kings and Rooks care whether they have moved, so every other piece is treated as at home.
fn is_home_square(piece: Piece, square: Position) -> bool {
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => square.row == color.pawn_row(),
        PieceKind::King => square == Position::new(color.back_row(), 4),
        PieceKind::Rook => square.row == color.back_row() && (square.col == 0 || square.col == 7),
        _ => true,
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;
    /// Wrapper for [`Board::from_layout`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_layout(s)
    }
}

impl Default for Board {
    /// Standard starting position for Chess.
    fn default() -> Self {
        Self::from_layout(LAYOUT_STARTPOS).expect("the starting layout is valid")
    }
}
