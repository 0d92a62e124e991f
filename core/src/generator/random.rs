use super::*;

/// Chance of any single cell holding a mine.
pub const MINE_PROBABILITY: f64 = 0.5;

/// Generation strategy that fills every cell independently, with no safe start tile and no fixed mine count.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Board {
        use rand::prelude::*;

        let config = GameConfig::new(config.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let cells = Array2::from_shape_simple_fn(config.size.to_nd_index(), || {
            Cell::from(rng.random_bool(MINE_PROBABILITY))
        });

        let board = Board::from_cells(cells).expect("clamped config is a valid board shape");
        log::debug!(
            "Generated {}x{} board with {} mines from seed {}",
            config.size.0,
            config.size.1,
            board.mine_count(),
            self.seed
        );
        board
    }
}
