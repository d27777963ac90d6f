use serde::{Deserialize, Serialize};

/// Cardinal direction between two adjacent rooms.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const LEN: usize = 4;
    pub const ALL: [Self; Self::LEN] = [Self::North, Self::East, Self::South, Self::West];

    /// Unit `(dx, dy)` offset. North is `-y`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction of a coordinate delta, chosen by its dominant axis.
    ///
    /// The delta is horizontal only when `|dx| > |dy|`; ties (including the zero
    /// delta) resolve to the vertical axis.
    ///
    /// ```
    /// use cavern_engine::Direction;
    ///
    /// assert_eq!(Direction::from_delta(3, -1), Direction::East);
    /// assert_eq!(Direction::from_delta(-2, 2), Direction::South);
    /// assert_eq!(Direction::from_delta(0, -1), Direction::North);
    /// ```
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0 { Self::East } else { Self::West }
        } else if dy > 0 {
            Self::South
        } else {
            Self::North
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_offset_matches_from_delta() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            assert_eq!(Direction::from_delta(dx, dy), dir);
        }
    }

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn test_step_and_back() {
        let origin = Position::new(4, 7);
        for dir in Direction::ALL {
            assert_eq!(origin.step(dir).step(dir.opposite()), origin);
        }
        assert_eq!(origin.step(Direction::North), Position::new(4, 6));
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }
}
