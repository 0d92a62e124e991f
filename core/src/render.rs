use core::fmt;

use crate::*;

/// Text view of a game: `.` for hidden cells, `X` for uncovered empty cells and the cell code otherwise.
///
/// With `reveal_all` every cell is printed as its code, which is how the board is shown once the game is over.
#[derive(Copy, Clone, Debug)]
pub struct BoardView<'a> {
    pub state: &'a GameState,
    pub reveal_all: bool,
}

impl<'a> BoardView<'a> {
    pub fn hidden(state: &'a GameState) -> Self {
        Self {
            state,
            reveal_all: false,
        }
    }

    pub fn revealed(state: &'a GameState) -> Self {
        Self {
            state,
            reveal_all: true,
        }
    }

    fn symbol(&self, coords: Coord2) -> char {
        let cell = self.state.cell_at(coords);
        match (self.reveal_all, self.state.is_revealed(coords), cell) {
            (true, _, cell) => code_char(cell),
            (false, false, _) => '.',
            (false, true, Cell::Empty) => 'X',
            (false, true, cell) => code_char(cell),
        }
    }
}

fn code_char(cell: Cell) -> char {
    char::from(b'0' + cell.code())
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.state.size();
        for row in 0..rows {
            for col in 0..cols {
                write!(f, "{} ", self.symbol((row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_view_marks_revealed_empty_cells_with_x() {
        let mut game = GameState::new(Board::from_codes(&[[0, 1], [0, 0]]).unwrap());
        game.reveal((1, 0)).unwrap();

        assert_eq!(BoardView::hidden(&game).to_string(), ". . \nX . \n");
    }

    #[test]
    fn hidden_view_shows_revealed_mine_code() {
        let mut game = GameState::new(Board::from_codes(&[[0, 1]]).unwrap());
        game.reveal((0, 1)).unwrap();

        assert_eq!(BoardView::hidden(&game).to_string(), ". 1 \n");
    }

    #[test]
    fn revealed_view_prints_every_code() {
        let game = GameState::new(Board::from_codes(&[[0, 1], [1, 0]]).unwrap());

        assert_eq!(BoardView::revealed(&game).to_string(), "0 1 \n1 0 \n");
    }
}
