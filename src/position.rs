/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

/// Represents a single square of an `8x8` chess board, as a `(row, col)` pair.
///
/// Row `0` is Black's back rank (rank 8) and row `7` is White's (rank 1).
/// Column `0` is the a-file and column `7` the h-file:
/// ```text
/// 8| (0,0) (0,1) ... (0,7)
/// 7| (1,0) (1,1) ... (1,7)
///  |  ...
/// 1| (7,0) (7,1) ... (7,7)
///  +--------------------
///     a     b   ...   h
/// ```
///
/// Fields are signed so that squares off the board can be represented and rejected,
/// rather than silently wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Debug)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Width and height of the board.
    pub const SIZE: i8 = 8;

    /// Creates a new [`Position`]. No bounds checking is performed.
    #[inline(always)]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Returns `true` if this [`Position`] lies on the board.
    ///
    /// # Example
    /// ```
    /// # use rookery::Position;
    /// assert!(Position::new(0, 7).is_on_board());
    /// assert!(!Position::new(8, 0).is_on_board());
    /// assert!(!Position::new(3, -1).is_on_board());
    /// ```
    #[inline(always)]
    pub const fn is_on_board(&self) -> bool {
        self.row >= 0 && self.row < Self::SIZE && self.col >= 0 && self.col < Self::SIZE
    }

    /// Returns the [`Position`] offset by `(dr, dc)`. The result may be off the board.
    #[inline(always)]
    pub const fn offset(&self, dr: i8, dc: i8) -> Self {
        Self::new(self.row + dr, self.col + dc)
    }

    /// Index of this square into a row-major array of [`Position::COUNT`] cells.
    ///
    /// Only meaningful for on-board squares.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        (self.row as usize) * 8 + self.col as usize
    }

    /// Inverse of [`Position::index`].
    #[inline(always)]
    pub const fn from_index(index: usize) -> Self {
        Self::new((index / 8) as i8, (index % 8) as i8)
    }

    /// An iterator over all 64 squares, row by row starting at a8.
    #[inline(always)]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_index)
    }

    /// Parses a square from coordinate notation, such as `e4`. Case-insensitive.
    ///
    /// # Example
    /// ```
    /// # use rookery::Position;
    /// assert_eq!(Position::from_uci("e2").unwrap(), Position::new(6, 4));
    /// assert_eq!(Position::from_uci("A8").unwrap(), Position::new(0, 0));
    /// assert!(Position::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid square {square:?}: must be a file and a rank, such as \"e4\"");
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {square:?}: must be between a and h");
        }

        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(anyhow!("Invalid rank {rank:?} in square {square:?}: must be between 1 and 8"))?;

        Ok(Self::new(8 - rank as i8, (file as u8 - b'a') as i8))
    }

    /// Formats this square in coordinate notation, such as `e4`.
    ///
    /// # Panics
    ///
    /// If the square is off the board.
    pub fn to_uci(&self) -> String {
        assert!(self.is_on_board(), "{self:?} has no coordinate notation");
        format!("{}{}", (b'a' + self.col as u8) as char, 8 - self.row)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;
    /// Wrapper for [`Position::from_uci`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s.trim())
    }
}

impl fmt::Display for Position {
    /// On-board squares display in coordinate notation; anything else as its raw pair.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}", self.to_uci())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

/// Parses a move written as `<file><rank>-<file><rank>`, such as `e2-e4`, into its two squares.
///
/// Surrounding whitespace is ignored and letters are case-insensitive.
///
/// # Example
/// ```
/// # use rookery::{parse_move, Position};
/// let (from, to) = parse_move(" E2-e4 ").unwrap();
/// assert_eq!(from, Position::new(6, 4));
/// assert_eq!(to, Position::new(4, 4));
/// assert!(parse_move("e2e4").is_err());
/// ```
pub fn parse_move(notation: &str) -> Result<(Position, Position)> {
    let notation = notation.trim();
    let (from, to) = notation
        .split_once('-')
        .filter(|(from, to)| from.len() == 2 && to.len() == 2)
        .ok_or(anyhow!("Invalid move format {notation:?} (example: e2-e4)"))?;

    let from = Position::from_uci(from).context("Invalid source square")?;
    let to = Position::from_uci(to).context("Invalid destination square")?;

    Ok((from, to))
}
