/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{Board, Color, Move, Position};

/// Where the game stands for the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GameStatus {
    /// Not in check, with at least one legal move.
    Ongoing,

    /// In check, with at least one legal move out of it.
    Check,

    /// In check, with no legal move out of it. The opponent wins.
    Checkmate,

    /// Not in check, with no legal move at all. The game is drawn.
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if the game cannot continue.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ongoing => "ongoing",
            Self::Check => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        };
        f.write_str(s)
    }
}

impl Board {
    /// Returns `true` if `color`'s King is attacked by any enemy piece.
    ///
    /// # Example
    /// ```
    /// # use rookery::{Board, Color};
    /// let board = Board::from_layout("4k3/8/8/8/8/8/8/r3K3").unwrap();
    /// assert!(board.is_in_check(Color::White));
    /// assert!(!board.is_in_check(Color::Black));
    /// ```
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    /// Returns `true` if any piece of color `by` could capture on `square`.
    pub fn is_square_attacked(&self, square: Position, by: Color) -> bool {
        self.pieces(by)
            .any(|(from, piece)| self.attacks(piece, from, square))
    }

    /// Returns `true` if `color` is in check and no legal move gets it out.
    ///
    /// Every candidate move is tried and undone, so the board is left unchanged.
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Returns `true` if `color` is not in check but has no legal move.
    ///
    /// Every candidate move is tried and undone, so the board is left unchanged.
    pub fn is_stalemate(&mut self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Classifies the position for `color`, who is about to move.
    pub fn status(&mut self, color: Color) -> GameStatus {
        match (self.is_in_check(color), self.has_legal_move(color)) {
            (false, true) => GameStatus::Ongoing,
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
        }
    }

    /// Returns `true` if `color` has at least one move that does not leave it in check.
    ///
    /// Stops at the first one found.
    pub fn has_legal_move(&mut self, color: Color) -> bool {
        self.squares_of(color)
            .into_iter()
            .any(|from| !self.legal_moves_from(from).is_empty())
    }

    /// Generates every legal move for `color`.
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        self.squares_of(color)
            .into_iter()
            .flat_map(|from| self.legal_moves_from(from))
            .collect()
    }

    /// Generates every legal move for the piece on `from`, if there is one.
    ///
    /// # Example
    /// ```
    /// # use rookery::Board;
    /// let mut board = Board::default();
    /// assert_eq!(board.legal_moves_from("g1".parse().unwrap()).len(), 2);
    /// assert!(board.legal_moves_from("e4".parse().unwrap()).is_empty());
    /// ```
    pub fn legal_moves_from(&mut self, from: Position) -> Vec<Move> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        for to in Position::iter() {
            if let Ok(mv) = self.validate_move(from, to, piece.color()) {
                if self.is_legal(mv) {
                    moves.push(mv);
                }
            }
        }
        moves
    }

    /// Squares of all of `color`'s pieces, collected so that moves can be tried while iterating.
    fn squares_of(&self, color: Color) -> Vec<Position> {
        self.pieces(color).map(|(square, _)| square).collect()
    }
}
