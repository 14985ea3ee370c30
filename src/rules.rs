/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color, Move, MoveError, MoveKind, Piece, PieceKind, Position};

impl Board {
    /// Checks whether `mover` may move the piece on `from` to `to`, returning the resulting [`Move`].
    ///
    /// This checks turn, bounds, friendly captures and the piece's movement rules,
    /// including castling and en passant. It does *not* check whether the move would
    /// leave `mover`'s King in check; see [`Board::play_move`] for that.
    ///
    /// Castling requires a look at the King's transit square, which is done by briefly
    /// making a King step, so this needs mutable access. The board is always restored.
    ///
    /// # Example
    /// ```
    /// # use rookery::{Board, Color, MoveError, MoveKind};
    /// let mut board = Board::default();
    /// let e2 = "e2".parse().unwrap();
    ///
    /// let mv = board.validate_move(e2, "e4".parse().unwrap(), Color::White).unwrap();
    /// assert_eq!(mv.kind, MoveKind::PawnDoublePush);
    ///
    /// let err = board.validate_move(e2, "e5".parse().unwrap(), Color::White);
    /// assert!(matches!(err, Err(MoveError::IllegalGeometry { .. })));
    /// ```
    pub fn validate_move(
        &mut self,
        from: Position,
        to: Position,
        mover: Color,
    ) -> Result<Move, MoveError> {
        let piece = self.piece_at(from).ok_or(MoveError::EmptySource(from))?;

        if piece.color() != mover {
            return Err(MoveError::WrongTurn {
                square: from,
                piece,
                mover,
            });
        }

        if !to.is_on_board() {
            return Err(MoveError::OutOfBounds(to));
        }

        let target = self.piece_at(to);
        if let Some(friendly) = target.filter(|target| target.color() == mover) {
            return Err(MoveError::FriendlyCapture {
                square: to,
                piece: friendly,
            });
        }

        let kind = match self.reaches(piece, from, to) {
            Some(kind) => Some(kind),
            None if piece.is_king() => self.castling_kind(piece, from, to),
            None => None,
        }
        .ok_or(MoveError::IllegalGeometry { piece, from, to })?;

        let captured = if kind == MoveKind::EnPassant {
            self.piece_at(Position::new(from.row, to.col))
        } else {
            target
        };

        Ok(Move {
            from,
            to,
            piece,
            captured,
            kind,
        })
    }

    /// Validates and makes a move for `mover`, rejecting it if it would leave `mover` in check.
    ///
    /// On success the move has been made and is returned. On failure the board is unchanged.
    ///
    /// # Example
    /// ```
    /// # use rookery::{Board, Color, MoveError};
    /// let mut board = Board::default();
    /// let mv = board.play_move("e2".parse().unwrap(), "e4".parse().unwrap(), Color::White).unwrap();
    /// assert_eq!(board.last_move(), Some(&mv));
    ///
    /// // Black cannot move White's pieces
    /// let err = board.play_move("d2".parse().unwrap(), "d4".parse().unwrap(), Color::Black);
    /// assert!(matches!(err, Err(MoveError::WrongTurn { .. })));
    /// ```
    pub fn play_move(
        &mut self,
        from: Position,
        to: Position,
        mover: Color,
    ) -> Result<Move, MoveError> {
        let mv = self.validate_move(from, to, mover)?;

        self.make_move(mv);
        if self.is_in_check(mover) {
            self.unmake_move(mv);
            return Err(MoveError::SelfCheck(mv));
        }

        Ok(mv)
    }

    /// Returns `true` if making the already-validated `mv` would not leave its mover in check.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let color = mv.color();
        !self.with_move_made(mv, |board| board.is_in_check(color))
    }

    /// Returns `true` if the piece on `from` could capture on `to`, were an enemy piece there.
    ///
    /// This is the movement rule used for check detection. It never considers castling,
    /// so it never needs to detect check itself.
    pub(crate) fn attacks(&self, piece: Piece, from: Position, to: Position) -> bool {
        if piece.is_pawn() {
            to.row - from.row == piece.color().forward() && (to.col - from.col).abs() == 1
        } else {
            self.reaches(piece, from, to).is_some()
        }
    }

    /// Determines what kind of move it would be for `piece` to go from `from` to `to`,
    /// under its ordinary movement rules. Castling is not considered here.
    ///
    /// Returns `None` if the piece cannot get there.
    fn reaches(&self, piece: Piece, from: Position, to: Position) -> Option<MoveKind> {
        if from == to {
            return None;
        }

        let dr = to.row - from.row;
        let dc = to.col - from.col;

        let straight = dr == 0 || dc == 0;
        let diagonal = dr.abs() == dc.abs();

        let reachable = match piece.kind() {
            PieceKind::Pawn => return self.pawn_move_kind(piece, from, to, dr, dc),
            PieceKind::Rook => straight && self.is_path_clear(from, to),
            PieceKind::Bishop => diagonal && self.is_path_clear(from, to),
            PieceKind::Queen => (straight || diagonal) && self.is_path_clear(from, to),
            PieceKind::Knight => matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2)),
            PieceKind::King => dr.abs() <= 1 && dc.abs() <= 1,
        };

        reachable.then_some(MoveKind::Normal)
    }

    /// Pawn movement: single push, double push from the starting square,
    /// diagonal capture, and en passant.
    fn pawn_move_kind(
        &self,
        pawn: Piece,
        from: Position,
        to: Position,
        dr: i8,
        dc: i8,
    ) -> Option<MoveKind> {
        let forward = pawn.color().forward();

        if dc == 0 && dr == forward && self.is_empty(to) {
            return Some(MoveKind::Normal);
        }

        if dc == 0
            && dr == 2 * forward
            && !pawn.has_moved()
            && self.is_empty(to)
            && self.is_empty(from.offset(forward, 0))
        {
            return Some(MoveKind::PawnDoublePush);
        }

        if dr == forward && dc.abs() == 1 {
            if !self.is_empty(to) {
                return Some(MoveKind::Normal);
            }

            if self.can_en_passant(pawn, from, to) {
                return Some(MoveKind::EnPassant);
            }
        }

        None
    }

    /// Returns `true` if every square strictly between `from` and `to` is empty.
    ///
    /// `from` and `to` must share a row, column, or diagonal.
    fn is_path_clear(&self, from: Position, to: Position) -> bool {
        let dr = (to.row - from.row).signum();
        let dc = (to.col - from.col).signum();

        let mut square = from.offset(dr, dc);
        while square != to {
            if !self.is_empty(square) {
                return false;
            }
            square = square.offset(dr, dc);
        }

        true
    }

    /// Returns `true` if `pawn` on `from` may capture en passant by moving diagonally onto `to`.
    ///
    /// Only the enemy Pawn that double-pushed on the immediately preceding move may be taken,
    /// and only by a Pawn standing right beside it.
    fn can_en_passant(&self, pawn: Piece, from: Position, to: Position) -> bool {
        let Some(last) = self.last_move() else {
            return false;
        };

        last.is_double_push()
            && last.color() != pawn.color()
            && from.row == pawn.color().en_passant_row()
            && last.to.row == from.row
            && last.to.col == to.col
    }

    /// Determines whether `king` may castle from `from` to `to`, and which way.
    ///
    /// The King and the Rook must both be unmoved, every square between them empty,
    /// and the King may neither be in check nor pass through an attacked square.
    /// Whether the King lands in check is left to the caller's self-check test.
    fn castling_kind(&mut self, king: Piece, from: Position, to: Position) -> Option<MoveKind> {
        if king.has_moved() || from.row != to.row || (to.col - from.col).abs() != 2 {
            return None;
        }

        let color = king.color();
        let short = to.col > from.col;
        let rook_square = Position::new(from.row, if short { 7 } else { 0 });

        match self.piece_at(rook_square) {
            Some(rook) if rook.is_rook() && rook.color() == color && !rook.has_moved() => {}
            _ => return None,
        }

        let (lo, hi) = if short {
            (from.col + 1, rook_square.col)
        } else {
            (rook_square.col + 1, from.col)
        };
        if (lo..hi).any(|col| !self.is_empty(Position::new(from.row, col))) {
            return None;
        }

        if self.is_in_check(color) {
            return None;
        }

        // Step the King onto the square it crosses and look for check there
        let transit = Move {
            from,
            to: from.offset(0, (to.col - from.col).signum()),
            piece: king,
            captured: None,
            kind: MoveKind::Normal,
        };
        if self.with_move_made(transit, |board| board.is_in_check(color)) {
            return None;
        }

        Some(if short {
            MoveKind::ShortCastle
        } else {
            MoveKind::LongCastle
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn setup(layout: &str) -> Board {
        Board::from_layout(layout).unwrap()
    }

    /// All destinations `from` can reach for `color`, in coordinate notation and sorted.
    fn destinations(board: &mut Board, from: &str, color: Color) -> Vec<String> {
        let from = sq(from);
        let mut squares = Position::iter()
            .filter(|&to| board.validate_move(from, to, color).is_ok())
            .map(|to| to.to_string())
            .collect::<Vec<_>>();
        squares.sort();
        squares
    }

    #[test]
    fn test_rejection_reasons() {
        let mut board = Board::default();

        assert_eq!(
            board.validate_move(sq("e4"), sq("e5"), Color::White),
            Err(MoveError::EmptySource(sq("e4")))
        );
        assert!(matches!(
            board.validate_move(sq("e7"), sq("e5"), Color::White),
            Err(MoveError::WrongTurn { .. })
        ));
        assert_eq!(
            board.validate_move(sq("a2"), Position::new(6, -1), Color::White),
            Err(MoveError::OutOfBounds(Position::new(6, -1)))
        );
        assert_eq!(
            board.validate_move(sq("a1"), sq("a2"), Color::White),
            Err(MoveError::FriendlyCapture {
                square: sq("a2"),
                piece: Piece::WHITE_PAWN
            })
        );
        assert!(matches!(
            board.validate_move(sq("a1"), sq("a3"), Color::White),
            Err(MoveError::IllegalGeometry { .. })
        ));
        assert!(matches!(
            board.validate_move(sq("a1"), sq("a1"), Color::White),
            Err(MoveError::FriendlyCapture { .. })
        ));
    }

    #[test]
    fn test_rook_moves() {
        let mut board = setup("4k3/8/8/8/1p1R2P1/8/8/4K3");
        assert_eq!(
            destinations(&mut board, "d4", Color::White),
            ["b4", "c4", "d1", "d2", "d3", "d5", "d6", "d7", "d8", "e4", "f4"]
        );
    }

    #[test]
    fn test_bishop_moves() {
        let mut board = setup("4k3/8/5p2/8/3B4/8/1P6/4K3");
        assert_eq!(
            destinations(&mut board, "d4", Color::White),
            ["a7", "b6", "c3", "c5", "e3", "e5", "f2", "f6", "g1"]
        );
    }

    #[test]
    fn test_queen_moves() {
        let mut board = setup("4k3/8/8/8/8/8/PP6/QP2K3");
        assert_eq!(destinations(&mut board, "a1", Color::White), Vec::<String>::new());

        let mut board = setup("4k3/8/8/8/8/2p5/P7/QP2K3");
        assert_eq!(destinations(&mut board, "a1", Color::White), ["b2", "c3"]);
    }

    #[test]
    fn test_knight_ignores_blockers() {
        let mut board = Board::default();
        assert_eq!(destinations(&mut board, "g1", Color::White), ["f3", "h3"]);
        assert_eq!(destinations(&mut board, "b8", Color::Black), ["a6", "c6"]);
    }

    #[test]
    fn test_king_steps() {
        let mut board = setup("4k3/8/8/8/8/8/3P4/4K3");
        assert_eq!(
            destinations(&mut board, "e1", Color::White),
            ["d1", "e2", "f1", "f2"]
        );
    }

    #[test]
    fn test_pawn_pushes_and_captures() {
        let mut board = setup("4k3/8/8/8/8/2n1p3/3P4/4K3");
        assert_eq!(
            destinations(&mut board, "d2", Color::White),
            ["c3", "d3", "d4", "e3"]
        );

        // A blocked pawn cannot jump
        let mut board = setup("4k3/8/8/8/8/3n4/3P4/4K3");
        assert_eq!(destinations(&mut board, "d2", Color::White), Vec::<String>::new());

        // A moved pawn cannot double push
        let mut board = setup("4k3/8/8/8/8/3P4/8/4K3");
        assert_eq!(destinations(&mut board, "d3", Color::White), ["d4"]);

        // Black pawns move the other way
        let mut board = setup("4k3/3p4/4N3/8/8/8/8/4K3");
        assert_eq!(
            destinations(&mut board, "d7", Color::Black),
            ["d5", "d6", "e6"]
        );
    }

    #[test]
    fn test_en_passant() {
        let mut board = setup("4k3/3p4/8/4P3/8/8/8/4K3");
        board.play_move(sq("d7"), sq("d5"), Color::Black).unwrap();

        let mv = board.validate_move(sq("e5"), sq("d6"), Color::White).unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(mv.captured, Some(Piece::BLACK_PAWN.with_moved(true)));

        let before = board.clone();
        board.make_move(mv);
        assert!(board.is_empty(sq("d5")));
        assert!(board.is_empty(sq("e5")));
        assert_eq!(board.piece_at(sq("d6")).map(|p| p.kind()), Some(PieceKind::Pawn));

        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_en_passant_only_immediately() {
        let mut board = setup("4k3/3p3p/8/4P3/8/8/8/4K3");
        board.play_move(sq("d7"), sq("d5"), Color::Black).unwrap();
        board.play_move(sq("e1"), sq("e2"), Color::White).unwrap();
        board.play_move(sq("h7"), sq("h6"), Color::Black).unwrap();

        assert!(matches!(
            board.validate_move(sq("e5"), sq("d6"), Color::White),
            Err(MoveError::IllegalGeometry { .. })
        ));
    }

    #[test]
    fn test_en_passant_needs_double_push() {
        let mut board = setup("4k3/8/3p4/4P3/8/8/8/4K3");
        board.play_move(sq("d6"), sq("d5"), Color::Black).unwrap();

        assert!(board.validate_move(sq("e5"), sq("d6"), Color::White).is_err());
    }

    #[test]
    fn test_en_passant_only_against_that_pawn() {
        let mut board = setup("4k3/3p4/8/4P1p1/8/8/8/4K3");
        board.play_move(sq("d7"), sq("d5"), Color::Black).unwrap();

        assert!(board.validate_move(sq("e5"), sq("d6"), Color::White).is_ok());
        assert!(board.validate_move(sq("e5"), sq("f6"), Color::White).is_err());
    }

    #[test]
    fn test_black_en_passant() {
        let mut board = setup("4k3/8/8/8/5p2/8/4P3/4K3");
        board.play_move(sq("e2"), sq("e4"), Color::White).unwrap();

        let mv = board.play_move(sq("f4"), sq("e3"), Color::Black).unwrap();
        assert!(mv.is_en_passant());
        assert!(board.is_empty(sq("e4")));
    }

    #[test]
    fn test_castling_both_sides() {
        let layout = "r3k2r/8/8/8/8/8/8/R3K2R";

        let mut board = setup(layout);
        let mv = board.play_move(sq("e1"), sq("g1"), Color::White).unwrap();
        assert_eq!(mv.kind, MoveKind::ShortCastle);
        assert_eq!(board.piece_at(sq("g1")), Some(Piece::WHITE_KING.with_moved(true)));
        assert_eq!(board.piece_at(sq("f1")), Some(Piece::WHITE_ROOK.with_moved(true)));
        assert!(board.is_empty(sq("h1")));
        assert!(board.is_empty(sq("e1")));
        assert_eq!(board.king_square(Color::White), sq("g1"));

        let mut board = setup(layout);
        let mv = board.play_move(sq("e8"), sq("c8"), Color::Black).unwrap();
        assert_eq!(mv.kind, MoveKind::LongCastle);
        assert_eq!(board.piece_at(sq("c8")), Some(Piece::BLACK_KING.with_moved(true)));
        assert_eq!(board.piece_at(sq("d8")), Some(Piece::BLACK_ROOK.with_moved(true)));
        assert!(board.is_empty(sq("a8")));
    }

    #[test]
    fn test_castling_undo() {
        let mut board = setup("r3k2r/8/8/8/8/8/8/R3K2R");
        let before = board.clone();

        let mv = board.validate_move(sq("e1"), sq("c1"), Color::White).unwrap();
        board.make_move(mv);
        board.unmake_move(mv);
        assert_eq!(board, before);
    }

    #[test]
    fn test_castling_rejections() {
        let illegal = |layout: &str, from: &str, to: &str, color: Color| {
            let mut board = setup(layout);
            assert!(
                board.play_move(sq(from), sq(to), color).is_err(),
                "castling {from}-{to} should be illegal in {layout}"
            );
        };

        // Blocked by a knight
        illegal("4k3/8/8/8/8/8/8/R3K1NR", "e1", "g1", Color::White);
        // Queenside blocked on b1
        illegal("4k3/8/8/8/8/8/8/RN2K2R", "e1", "c1", Color::White);
        // King in check
        illegal("4k3/8/8/8/8/8/4r3/R3K2R", "e1", "g1", Color::White);
        // Passing through check on f1
        illegal("4k3/8/8/8/8/8/5r2/R3K2R", "e1", "g1", Color::White);
        // Passing through a pawn attack on d8
        illegal("r3k3/2P5/8/8/8/8/8/4K3", "e8", "c8", Color::Black);
        // Landing in check on g1
        illegal("4k3/8/8/8/8/8/6r1/R3K2R", "e1", "g1", Color::White);
        // No rook
        illegal("4k3/8/8/8/8/8/8/4K3", "e1", "g1", Color::White);
        // Rook of the wrong color in the corner
        illegal("4k3/8/8/8/8/8/8/4K2r", "e1", "g1", Color::White);
        // Three squares is not castling
        illegal("4k3/8/8/8/8/8/8/R3K2R", "e1", "b1", Color::White);
    }

    #[test]
    fn test_castling_rejected_after_moving() {
        let mut board = setup("4k3/8/8/8/8/8/8/R3K2R");
        board.play_move(sq("h1"), sq("h2"), Color::White).unwrap();
        board.play_move(sq("e8"), sq("d8"), Color::Black).unwrap();
        board.play_move(sq("h2"), sq("h1"), Color::White).unwrap();
        board.play_move(sq("d8"), sq("e8"), Color::Black).unwrap();
        assert!(board.play_move(sq("e1"), sq("g1"), Color::White).is_err());

        // The other rook is still fine
        assert!(board.play_move(sq("e1"), sq("c1"), Color::White).is_ok());

        let mut board = setup("4k3/8/8/8/8/8/8/R3K2R");
        board.play_move(sq("e1"), sq("e2"), Color::White).unwrap();
        board.play_move(sq("e8"), sq("d8"), Color::Black).unwrap();
        board.play_move(sq("e2"), sq("e1"), Color::White).unwrap();
        board.play_move(sq("d8"), sq("e8"), Color::Black).unwrap();
        assert!(board.play_move(sq("e1"), sq("g1"), Color::White).is_err());
        assert!(board.play_move(sq("e1"), sq("c1"), Color::White).is_err());
    }

    #[test]
    fn test_queenside_castling_ignores_attack_on_b_file() {
        // The rook on b8 attacks b1, which the King never crosses
        let mut board = setup("1r2k3/8/8/8/8/8/8/R3K3");
        let mv = board.play_move(sq("e1"), sq("c1"), Color::White).unwrap();
        assert_eq!(mv.kind, MoveKind::LongCastle);
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut board = setup("4k3/4r3/8/8/8/8/4N3/4K3");
        let before = board.clone();

        // The knight may geometrically move...
        assert!(board.validate_move(sq("e2"), sq("c3"), Color::White).is_ok());

        // ...but not legally
        assert!(matches!(
            board.play_move(sq("e2"), sq("c3"), Color::White),
            Err(MoveError::SelfCheck(_))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_king_cannot_step_into_check() {
        let mut board = setup("4k3/8/8/8/8/8/3r4/4K3");
        assert!(matches!(
            board.play_move(sq("e1"), sq("e2"), Color::White),
            Err(MoveError::SelfCheck(_))
        ));
        // Capturing the undefended rook is fine
        assert!(board.play_move(sq("e1"), sq("d2"), Color::White).is_ok());
    }

    #[test]
    fn test_en_passant_discovered_check() {
        // Taking en passant would clear the fourth rank between the Rook and the King
        let mut board = setup("8/8/8/8/k3p2R/8/3P4/4K3");
        board.play_move(sq("d2"), sq("d4"), Color::White).unwrap();

        assert!(board.validate_move(sq("e4"), sq("d3"), Color::Black).is_ok());
        assert!(matches!(
            board.play_move(sq("e4"), sq("d3"), Color::Black),
            Err(MoveError::SelfCheck(_))
        ));
    }
}
