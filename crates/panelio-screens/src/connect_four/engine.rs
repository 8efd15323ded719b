// SPDX-FileCopyrightText: 2026 Panelio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connect-Four game mechanics.
//!
//! The canonical game state is the move log: one 1..=7 column index per ply,
//! serialized into the visible document and re-derived into bitboards and a
//! grid on every read. Nothing else about the board is stored anywhere.
//!
//! Bit layout: column `c` occupies bits `c*7 .. c*7+5` of a 49-bit board;
//! bit `c*7+6` is an overflow guard so shifted win checks cannot wrap across
//! column boundaries.

/// Board columns.
pub const COLUMNS: usize = 7;

/// Board rows.
pub const ROWS: usize = 6;

/// Moves in a full board (draw threshold).
pub const FULL_BOARD: usize = COLUMNS * ROWS;

/// The append-only move log, 1-based column indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog(Vec<u8>);

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized log, keeping only digits `1..=7`.
    pub fn parse(digits: &str) -> Self {
        Self(
            digits
                .chars()
                .filter_map(|c| c.to_digit(10))
                .filter(|&d| (1..=COLUMNS as u32).contains(&d))
                .map(|d| d as u8)
                .collect(),
        )
    }

    /// Serialize back into the digit string embedded in the document.
    pub fn serialize(&self) -> String {
        self.0.iter().map(|m| m.to_string()).collect()
    }

    pub fn moves(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stones already dropped into a column.
    pub fn column_count(&self, column: u8) -> usize {
        self.0.iter().filter(|&&m| m == column).count()
    }

    /// Append a move. Rejects invalid columns and full columns.
    pub fn push(&mut self, column: u8) -> bool {
        if !(1..=COLUMNS as u8).contains(&column) || self.column_count(column) >= ROWS {
            return false;
        }
        self.0.push(column);
        true
    }

    /// Index (0 or 1) of the player whose turn it is next.
    pub fn player_on_turn(&self) -> usize {
        self.0.len() % 2
    }

    /// `(all stones, stones of the player who made the last move)`.
    fn bitboards(&self) -> (u64, u64) {
        let mut mask: u64 = 0;
        let mut position: u64 = 0;
        for &column in &self.0 {
            // Adding the column's bottom bit carries up to the lowest empty
            // cell; OR-ing keeps every previously occupied cell.
            mask |= mask + (1 << ((u64::from(column) - 1) * 7));
            position ^= mask;
        }
        (mask, position)
    }

    /// Whether the player who made the last move has four in a row.
    pub fn last_mover_won(&self) -> bool {
        let (_, position) = self.bitboards();
        has_connect_four(position)
    }

    /// Draw: a full board with no winner.
    pub fn is_draw(&self) -> bool {
        self.0.len() == FULL_BOARD && !self.last_mover_won()
    }
}

/// O(1) four-in-a-row detection over one player's bitboard.
///
/// Shift distances: 1 = vertical, 7 = horizontal, 6 and 8 = the diagonals.
/// Two shift-and-AND rounds per direction detect four consecutive set bits.
pub fn has_connect_four(position: u64) -> bool {
    // Vertical
    let m = position & (position >> 1);
    if m & (m >> 2) != 0 {
        return true;
    }
    // Horizontal
    let m = position & (position >> 7);
    if m & (m >> 14) != 0 {
        return true;
    }
    // Diagonal /
    let m = position & (position >> 6);
    if m & (m >> 12) != 0 {
        return true;
    }
    // Diagonal \
    let m = position & (position >> 8);
    if m & (m >> 16) != 0 {
        return true;
    }
    false
}

/// Re-derive the 6x7 grid from the move log. Row 0 is the top row.
pub fn derive_grid(moves: &MoveLog, token1: &str, token2: &str, empty: &str) -> Vec<Vec<String>> {
    let mut grid = vec![vec![empty.to_string(); COLUMNS]; ROWS];
    let mut heights = [0usize; COLUMNS];
    for (ply, &column) in moves.moves().iter().enumerate() {
        let c = usize::from(column) - 1;
        let row = ROWS - 1 - heights[c];
        grid[row][c] = if ply % 2 == 0 { token1 } else { token2 }.to_string();
        heights[c] += 1;
    }
    grid
}
