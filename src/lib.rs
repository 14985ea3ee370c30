/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board itself: piece placement, move history, and making or unmaking moves.
mod board;

/// Command-line flags and the commands accepted during a game.
mod cli;

/// Moves, their kinds, and the reasons one can be rejected.
mod moves;

/// Counting the leaves of the legal move tree, for verifying move legality.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// Squares of the board and move notation.
mod position;

/// Drawing a board for the terminal.
mod render;

/// Per-piece movement rules, castling, and en passant.
mod rules;

/// The game loop.
mod session;

/// Check, checkmate, stalemate, and legal move generation.
mod status;

/// Misc constants.
mod utils;

pub use board::*;
pub use cli::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use render::*;
pub use session::*;
pub use status::*;
pub use utils::*;
