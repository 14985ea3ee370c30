/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use thiserror::Error;

use super::{Color, Piece, Position};

/// Represents the different kinds of moves that can be made during a chess game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum MoveKind {
    /// A single piece moves (and possibly captures on its destination square).
    #[default]
    Normal,

    /// A special case on a Pawn's first move, wherein it can advance two squares forward.
    ///
    /// Only the move immediately after one of these may capture the Pawn en passant.
    PawnDoublePush,

    /// A Pawn captures an enemy Pawn that just double-pushed past it.
    ///
    /// The captured Pawn sits beside the capturing Pawn, not on the destination square.
    EnPassant,

    /// The King moves two squares towards the h-file Rook, which lands on the square the King crossed.
    ShortCastle,

    /// The King moves two squares towards the a-file Rook, which lands on the square the King crossed.
    LongCastle,
}

/// A transition from one square to another, along with everything needed to reverse it.
///
/// A [`Move`] returned from [`Board::validate_move`](crate::Board::validate_move) is a proposal;
/// once made with [`Board::make_move`](crate::Board::make_move) it can be reversed exactly with
/// [`Board::unmake_move`](crate::Board::unmake_move).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Move {
    /// Square the piece moves from.
    pub from: Position,

    /// Square the piece moves to.
    pub to: Position,

    /// The moving piece, exactly as it stood before the move (including its `has_moved` flag).
    pub piece: Piece,

    /// The piece removed from the board by this move, if any.
    ///
    /// For en passant, this is the Pawn taken from beside the destination.
    pub captured: Option<Piece>,

    /// What kind of move this is.
    pub kind: MoveKind,
}

impl Move {
    /// Returns `true` if this move is an en passant capture.
    #[inline(always)]
    pub const fn is_en_passant(&self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    /// Returns `true` if this move is either short or long castling.
    #[inline(always)]
    pub const fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::ShortCastle | MoveKind::LongCastle)
    }

    /// Returns `true` if this move is a Pawn advancing two squares.
    #[inline(always)]
    pub const fn is_double_push(&self) -> bool {
        matches!(self.kind, MoveKind::PawnDoublePush)
    }

    /// Returns `true` if this move removes an enemy piece from the board.
    #[inline(always)]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// The color of the side making this move.
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.piece.color()
    }

    /// Square of the piece removed by this move.
    ///
    /// This is the destination, except for en passant, where it is the square
    /// on the source row and the destination column.
    #[inline(always)]
    pub const fn capture_square(&self) -> Position {
        if self.is_en_passant() {
            Position::new(self.from.row, self.to.col)
        } else {
            self.to
        }
    }

    /// For castling moves, the Rook's source and destination squares.
    pub const fn rook_squares(&self) -> Option<(Position, Position)> {
        let row = self.from.row;
        match self.kind {
            MoveKind::ShortCastle => Some((Position::new(row, 7), Position::new(row, 5))),
            MoveKind::LongCastle => Some((Position::new(row, 0), Position::new(row, 3))),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    /// Displays in the `e2-e4` notation accepted by [`parse_move`](crate::parse_move).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Reasons a proposed move can be rejected.
///
/// All of these are recoverable: the board is left exactly as it was,
/// and the caller is expected to ask for another move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum MoveError {
    /// There is no piece on the source square.
    #[error("no piece at {0}")]
    EmptySource(Position),

    /// The piece on the source square belongs to the side that is not moving.
    #[error("it's {mover}'s turn, but the {} on {square} belongs to {}", .piece.name(), .piece.color())]
    WrongTurn {
        square: Position,
        piece: Piece,
        mover: Color,
    },

    /// The destination square is not on the board.
    #[error("destination {0} is outside the board")]
    OutOfBounds(Position),

    /// The destination square holds a piece of the moving side.
    #[error("cannot capture your own {} on {square}", .piece.kind())]
    FriendlyCapture { square: Position, piece: Piece },

    /// The piece cannot reach the destination under its movement rules,
    /// including blocked paths and failed castling or en passant conditions.
    #[error("invalid move for {}: {from} to {to}", .piece.name())]
    IllegalGeometry {
        piece: Piece,
        from: Position,
        to: Position,
    },

    /// The move is otherwise legal but would leave the mover's own King in check.
    #[error("move {0} would leave your king in check")]
    SelfCheck(Move),
}
