//! Game board representation and collision detection

use crate::tetromino::{occupied_cells, Mask, PieceColor};

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceColor),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Top-left corner of a piece's mask on the board. Signed so a candidate
/// position can be checked before it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        let (row, col) = Self::index(row, col)?;
        Some(self.cells[row][col])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some((row, col)) => {
                self.cells[row][col] = cell;
                true
            }
            None => false,
        }
    }

    fn index(row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_HEIGHT && col < BOARD_WIDTH).then_some((row, col))
    }

    /// Board coordinates covered by the occupied cells of `mask` at `offset`
    fn covered(mask: &Mask, offset: Offset) -> impl Iterator<Item = (i32, i32)> + '_ {
        occupied_cells(mask).map(move |(r, c)| (offset.y + r as i32, offset.x + c as i32))
    }

    /// Check whether every occupied mask cell lands inside the board on an
    /// empty cell. Unoccupied mask cells may hang off the board.
    pub fn is_placement_valid(&self, mask: &Mask, offset: Offset) -> bool {
        Self::covered(mask, offset)
            .all(|(row, col)| matches!(self.get(row, col), Some(Cell::Empty)))
    }

    /// Write `color` into every cell covered by the mask. Cells that fall
    /// outside the board are skipped.
    pub fn stamp(&mut self, mask: &Mask, offset: Offset, color: PieceColor) {
        for (row, col) in Self::covered(mask, offset) {
            self.set(row, col, Cell::Filled(color));
        }
    }

    /// Remove complete rows, scanning top to bottom. Each complete row pulls
    /// everything above it down by one and the top row is refilled empty.
    /// Returns the number of rows cleared.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut cleared = 0;

        for row in 0..BOARD_HEIGHT {
            if self.is_row_complete(row) {
                cleared += 1;
                self.cells.copy_within(0..row, 1);
                self.cells[0] = [Cell::Empty; BOARD_WIDTH];
            }
        }

        cleared
    }

    /// Check if a row has no empty cells
    fn is_row_complete(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Number of filled cells on the whole board
    #[allow(dead_code)]
    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_filled()).count())
            .sum()
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::PieceKind;

    fn fill_row_except(board: &mut Board, row: i32, gap: Option<i32>) {
        for col in 0..BOARD_WIDTH as i32 {
            if Some(col) != gap {
                board.set(row, col, Cell::Filled(PieceColor::Blue));
            }
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::new();
        assert!(board.set(5, 5, Cell::Filled(PieceColor::Red)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(PieceColor::Red)));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(BOARD_HEIGHT as i32, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
    }

    #[test]
    fn test_placement_rejects_walls_and_floor() {
        let board = Board::new();
        for kind in PieceKind::ALL {
            for mask in kind.shapes() {
                let cells: Vec<_> = occupied_cells(mask).collect();
                let min_c = cells.iter().map(|&(_, c)| c as i32).min().unwrap();
                let max_c = cells.iter().map(|&(_, c)| c as i32).max().unwrap();
                let max_r = cells.iter().map(|&(r, _)| r as i32).max().unwrap();

                // Flush against each edge is fine, one step further is not
                assert!(board.is_placement_valid(mask, Offset::new(-min_c, 0)));
                assert!(!board.is_placement_valid(mask, Offset::new(-min_c - 1, 0)));
                let right = BOARD_WIDTH as i32 - 1 - max_c;
                assert!(board.is_placement_valid(mask, Offset::new(right, 0)));
                assert!(!board.is_placement_valid(mask, Offset::new(right + 1, 0)));
                let floor = BOARD_HEIGHT as i32 - 1 - max_r;
                assert!(board.is_placement_valid(mask, Offset::new(3, floor)));
                assert!(!board.is_placement_valid(mask, Offset::new(3, floor + 1)));
            }
        }
    }

    #[test]
    fn test_empty_mask_cells_may_hang_off_board() {
        let board = Board::new();
        // Vertical I occupies only column 1 of its mask
        let mask = &PieceKind::I.shapes()[1];
        assert!(board.is_placement_valid(mask, Offset::new(-1, 0)));
        assert!(board.is_placement_valid(mask, Offset::new(8, 16)));
    }

    #[test]
    fn test_placement_rejects_overlap() {
        let mut board = Board::new();
        board.set(10, 4, Cell::Filled(PieceColor::Red));
        let mask = &PieceKind::O.shapes()[0];
        // O occupies mask cells (1,1),(1,2),(2,1),(2,2)
        assert!(!board.is_placement_valid(mask, Offset::new(3, 9)));
        assert!(board.is_placement_valid(mask, Offset::new(5, 9)));
    }

    #[test]
    fn test_stamp_writes_color() {
        let mut board = Board::new();
        let mask = &PieceKind::O.shapes()[0];
        board.stamp(mask, Offset::new(0, 0), PieceColor::Red);
        assert_eq!(board.filled_count(), 4);
        assert_eq!(board.get(1, 1), Some(Cell::Filled(PieceColor::Red)));
        assert_eq!(board.get(2, 2), Some(Cell::Filled(PieceColor::Red)));
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, None);
        board.set(18, 0, Cell::Filled(PieceColor::Red));

        let cleared = board.clear_completed_rows();
        assert_eq!(cleared, 1);
        // The block from row 18 should now be on row 19
        assert_eq!(board.get(19, 0), Some(Cell::Filled(PieceColor::Red)));
        assert!(board.get(18, 0).unwrap().is_empty());
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new();
        fill_row_except(&mut board, 19, None);
        fill_row_except(&mut board, 18, Some(3));
        fill_row_except(&mut board, 17, None);
        board.set(16, 7, Cell::Filled(PieceColor::Cyan));

        assert_eq!(board.clear_completed_rows(), 2);
        // Partial row drops to the bottom, the marker sits on top of it
        assert_eq!(board.get(19, 3), Some(Cell::Empty));
        assert_eq!(board.get(19, 0), Some(Cell::Filled(PieceColor::Blue)));
        assert_eq!(board.get(18, 7), Some(Cell::Filled(PieceColor::Cyan)));
        assert_eq!(board.filled_count(), 10);
    }

    #[test]
    fn test_stamp_then_clear_accounting() {
        let mut board = Board::new();
        for row in 16..20 {
            fill_row_except(&mut board, row, Some(0));
        }
        let before = board.filled_count();
        // Vertical I in column 0: mask column 1 at x = -1
        let mask = &PieceKind::I.shapes()[1];
        let offset = Offset::new(-1, 16);
        assert!(board.is_placement_valid(mask, offset));
        board.stamp(mask, offset, PieceColor::White);

        let cleared = board.clear_completed_rows();
        assert_eq!(cleared, 4);
        assert_eq!(board.filled_count(), before + 4 - 10 * cleared);
        assert!(board.rows().all(|row| row.iter().any(|c| c.is_empty())));
    }
}
