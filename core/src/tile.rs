use serde::{Deserialize, Serialize};

/// Content of a single board position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Mine,
}

impl Cell {
    /// Integer code used by the save file and the end-of-game board.
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Mine => 1,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Mine),
            _ => None,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl From<bool> for Cell {
    fn from(is_mine: bool) -> Self {
        if is_mine { Self::Mine } else { Self::Empty }
    }
}
