use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use render::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
pub mod persist;
mod render;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2) -> Self {
        Self { size }
    }

    pub fn new((rows, cols): Coord2) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        Self::new_unchecked((rows, cols))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked((10, 10))
    }
}

/// Rectangular grid of cell contents, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Board {
    /// Wraps a grid, rejecting empty grids and axes longer than [`Coord::MAX`].
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        let max = usize::from(Coord::MAX);
        if rows == 0 || cols == 0 || rows > max || cols > max {
            return Err(GameError::InvalidBoardShape);
        }

        let mine_count = cells.iter().filter(|cell| cell.is_mine()).count() as CellCount;
        Ok(Self { cells, mine_count })
    }

    /// Builds a board from rows of integer codes (`0` empty, `1` mine).
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut values = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(GameError::InvalidBoardShape);
            }
            for &code in row {
                values.push(Cell::from_code(code.into()).ok_or(GameError::InvalidCellValue)?);
            }
        }

        let cells = Array2::from_shape_vec((rows.len(), cols), values)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_cells(cells)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        // axes are bounded by `from_cells`
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn empty_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_codes_counts_mines() {
        let board = Board::from_codes(&[[0, 1, 1], [0, 0, 1]]).unwrap();

        assert_eq!(board.size(), (2, 3));
        assert_eq!(board.mine_count(), 3);
        assert_eq!(board.empty_count(), 3);
        assert_eq!(board[(0, 1)], Cell::Mine);
        assert_eq!(board[(1, 0)], Cell::Empty);
    }

    #[test]
    fn from_codes_rejects_ragged_rows() {
        let rows: [&[u8]; 2] = [&[0, 1], &[0]];
        assert_eq!(Board::from_codes(&rows), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn from_codes_rejects_values_outside_domain() {
        assert_eq!(
            Board::from_codes(&[[0, 2]]),
            Err(GameError::InvalidCellValue)
        );
    }

    #[test]
    fn empty_board_is_rejected() {
        let rows: [[u8; 0]; 0] = [];
        assert_eq!(Board::from_codes(&rows), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn validate_coords_checks_both_axes() {
        let board = Board::from_codes(&[[0, 0, 0], [0, 0, 0]]).unwrap();

        assert_eq!(board.validate_coords((1, 2)), Ok((1, 2)));
        assert_eq!(board.validate_coords((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.validate_coords((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn config_clamps_to_one_cell() {
        assert_eq!(GameConfig::new((0, 0)).size, (1, 1));
        assert_eq!(GameConfig::default().total_cells(), 100);
    }
}
