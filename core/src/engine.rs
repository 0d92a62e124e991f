use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Outcome of revealing a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// An empty cell was uncovered for the first time.
    Revealed(Cell),
    /// The cell was already uncovered, nothing changed.
    AlreadyRevealed(Cell),
    HitMine,
    Won,
}

impl RevealOutcome {
    /// The value of the cell that was revealed.
    pub const fn cell(self) -> Cell {
        match self {
            Self::Revealed(cell) | Self::AlreadyRevealed(cell) => cell,
            Self::HitMine => Cell::Mine,
            Self::Won => Cell::Empty,
        }
    }
}

/// A board, the cells the player has uncovered and the score, from first move to saved result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    revealed: Array2<bool>,
    score: CellCount,
    status: GameStatus,
}

impl GameState {
    pub fn new(board: Board) -> Self {
        let revealed = Array2::default(board.size().to_nd_index());
        Self {
            board,
            revealed,
            score: 0,
            status: Default::default(),
        }
    }

    /// Rebuilds a game in progress. The score is taken as given, even if it disagrees with `revealed`.
    pub fn from_parts(board: Board, revealed: Array2<bool>, score: CellCount) -> Result<Self> {
        if revealed.dim() != board.cells().dim() {
            return Err(GameError::InvalidBoardShape);
        }

        let state = Self {
            board,
            revealed,
            score,
            status: GameStatus::Active,
        };
        let expected = state.revealed_empty_count();
        if expected != score {
            log::warn!(
                "Score {} does not match the {} revealed empty cells",
                score,
                expected
            );
        }
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn revealed(&self) -> &Array2<bool> {
        &self.revealed
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn score(&self) -> CellCount {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed[coords.to_nd_index()]
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    /// Win predicate: every empty cell is uncovered. Revealed mines are not considered.
    pub fn all_empty_revealed(&self) -> bool {
        self.board
            .cells()
            .iter()
            .zip(self.revealed.iter())
            .all(|(cell, &revealed)| cell.is_mine() || revealed)
    }

    fn revealed_empty_count(&self) -> CellCount {
        self.board
            .cells()
            .iter()
            .zip(self.revealed.iter())
            .filter(|&(cell, &revealed)| !cell.is_mine() && revealed)
            .count() as CellCount
    }

    /// Uncovers a single cell, without opening its neighbors, then checks for a win or loss.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        self.check_not_finished()?;

        let (cell, first_time) = self.reveal_cell(coords);
        log::debug!("Reveal {:?}: {:?}, first time: {}", coords, cell, first_time);

        if cell.is_mine() {
            self.status = GameStatus::Lost;
            return Ok(RevealOutcome::HitMine);
        }

        if first_time {
            self.score = self.score.saturating_add(1);
        }

        if self.all_empty_revealed() {
            self.status = GameStatus::Won;
            Ok(RevealOutcome::Won)
        } else if first_time {
            Ok(RevealOutcome::Revealed(cell))
        } else {
            Ok(RevealOutcome::AlreadyRevealed(cell))
        }
    }

    /// Marks the cell revealed and returns its value, along with whether it was hidden before.
    fn reveal_cell(&mut self, coords: Coord2) -> (Cell, bool) {
        let flag = &mut self.revealed[coords.to_nd_index()];
        let first_time = !*flag;
        *flag = true;
        (self.board[coords], first_time)
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state<R: AsRef<[u8]>>(rows: &[R]) -> GameState {
        GameState::new(Board::from_codes(rows).unwrap())
    }

    #[test]
    fn reveal_marks_only_the_target_cell() {
        let mut game = state(&[[0, 0, 0], [0, 0, 0], [0, 0, 1]]);

        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(Cell::Empty));
        assert!(game.is_revealed((0, 0)));
        assert_eq!(game.revealed().iter().filter(|&&r| r).count(), 1);
        assert_eq!(game.status(), GameStatus::Active);
    }

    #[test]
    fn reveal_twice_is_idempotent_and_scores_once() {
        let mut game = state(&[[0, 0], [1, 0]]);

        let first = game.reveal((0, 1)).unwrap();
        let revealed = game.revealed().clone();
        let second = game.reveal((0, 1)).unwrap();

        assert_eq!(first.cell(), second.cell());
        assert_eq!(second, RevealOutcome::AlreadyRevealed(Cell::Empty));
        assert_eq!(game.revealed(), &revealed);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn small_board_scenario() {
        let mut game = state(&[[0, 1], [0, 0]]);

        assert_eq!(
            game.reveal((0, 0)).unwrap(),
            RevealOutcome::Revealed(Cell::Empty)
        );
        assert_eq!(game.score(), 1);
        assert!(!game.is_finished());

        assert_eq!(game.reveal((0, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn mine_loses_even_with_cells_left() {
        let mut game = state(&[[1, 0, 0, 0]]);

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert!(game.is_revealed((0, 0)));
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn revealing_last_empty_cell_wins() {
        let mut game = state(&[[0, 1], [1, 0]]);

        assert_eq!(
            game.reveal((0, 0)).unwrap(),
            RevealOutcome::Revealed(Cell::Empty)
        );
        assert_eq!(game.reveal((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn win_ignores_revealed_mines() {
        let board = Board::from_codes(&[[0, 1], [0, 1]]).unwrap();
        let revealed = Array2::from_shape_vec((2, 2), vec![true, true, false, true]).unwrap();
        let mut game = GameState::from_parts(board, revealed, 1).unwrap();

        assert!(!game.all_empty_revealed());
        assert_eq!(game.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        assert!(game.all_empty_revealed());
    }

    #[test]
    fn re_revealing_a_mine_still_loses() {
        let board = Board::from_codes(&[[1, 0]]).unwrap();
        let revealed = Array2::from_shape_vec((1, 2), vec![true, false]).unwrap();
        let mut game = GameState::from_parts(board, revealed, 0).unwrap();

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
    }

    #[test]
    fn board_with_no_empty_cells_only_loses() {
        let mut game = state(&[[1]]);

        assert!(game.all_empty_revealed());
        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
    }

    #[test]
    fn out_of_range_is_rejected_without_change() {
        let mut game = state(&[[0, 1]]);

        assert_eq!(game.reveal((0, 2)), Err(GameError::InvalidCoords));
        assert_eq!(game.reveal((1, 0)), Err(GameError::InvalidCoords));
        assert!(game.revealed().iter().all(|&r| !r));
    }

    #[test]
    fn finished_game_rejects_moves() {
        let mut game = state(&[[1, 0]]);

        game.reveal((0, 0)).unwrap();

        assert_eq!(game.reveal((0, 1)), Err(GameError::AlreadyEnded));
        assert!(!game.is_revealed((0, 1)));
    }

    #[test]
    fn from_parts_rejects_mismatched_shapes() {
        let board = Board::from_codes(&[[0, 1]]).unwrap();
        let revealed = Array2::default((2, 1));

        assert_eq!(
            GameState::from_parts(board, revealed, 0),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn from_parts_keeps_inconsistent_score() {
        let board = Board::from_codes(&[[0, 0]]).unwrap();
        let revealed = Array2::default((1, 2));

        let game = GameState::from_parts(board, revealed, 5).unwrap();

        assert_eq!(game.score(), 5);
        assert_eq!(game.status(), GameStatus::Active);
    }

    #[test]
    fn state_round_trips_through_serde() {
        let mut game = state(&[[0, 1], [0, 0]]);
        game.reveal((1, 1)).unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, game);
    }
}
