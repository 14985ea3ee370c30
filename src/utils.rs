/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Piece layout of the starting position of chess.
pub const LAYOUT_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// A popular layout for debugging move generation, with castling available for both sides.
pub const LAYOUT_KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R";

/// Sparse endgame layout that exercises en passant and horizontal pins.
pub const LAYOUT_ENDGAME_PINS: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8";
