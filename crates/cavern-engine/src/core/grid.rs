use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::direction::Direction;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    /// Open, walkable cell. Rooms can only be placed on floor.
    #[default]
    Floor,
    /// Solid cell.
    Wall,
    /// Cell occupied by a placed room.
    Room,
}

impl Cell {
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Cell::Wall)
    }

    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Cell::Floor)
    }

    /// Character used by the ASCII representation.
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Cell::Floor => '.',
            Cell::Wall => '#',
            Cell::Room => 'R',
        }
    }

    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Floor),
            '#' => Some(Cell::Wall),
            'R' => Some(Cell::Room),
            _ => None,
        }
    }
}

/// Integer grid coordinate.
///
/// `x` grows to the east and `y` grows to the south, so row `0` is the northern edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("({x}, {y})")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the adjacent position in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    #[display("grid has no rows")]
    Empty,
    #[display("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("invalid cell character {ch:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, ch: char },
}

/// Fixed-size two-dimensional grid of [`Cell`]s.
///
/// Cells are stored row-major. Every cell holds exactly one state; reads outside
/// the grid return `None` and neighbor counting treats them as walls.
///
/// # Example
///
/// ```
/// use cavern_engine::{Cell, Grid, Position};
///
/// let mut grid = Grid::filled(3, 2, Cell::Floor);
/// grid.set(Position::new(1, 1), Cell::Wall);
///
/// assert_eq!(grid.get(Position::new(1, 1)), Some(Cell::Wall));
/// assert_eq!(grid.get(Position::new(3, 0)), None);
/// assert_eq!(grid.to_ascii_rows(), vec!["...", ".#."]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid with every cell set to `cell`.
    #[must_use]
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    /// Creates a grid by evaluating `f` at every position, row by row.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(Position) -> Cell,
    {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(Self::position_of(x, y)))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn position_of(x: usize, y: usize) -> Position {
        Position::new(x as i32, y as i32)
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[expect(clippy::cast_sign_loss)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.y as usize * self.width + pos.x as usize)
    }

    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrites the cell at `pos`, returning the previous state.
    ///
    /// Returns `None` and leaves the grid untouched when `pos` is out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Option<Cell> {
        let i = self.index(pos)?;
        Some(std::mem::replace(&mut self.cells[i], cell))
    }

    /// Iterates over all cells with their positions, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(i, cell)| {
            let (x, y) = (i % self.width, i / self.width);
            (Self::position_of(x, y), *cell)
        })
    }

    /// Iterates over the rows from north to south.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    #[must_use]
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// Counts wall cells among the 8 neighbors of `pos`.
    ///
    /// Neighbors outside the grid count as walls. Room cells do not.
    #[must_use]
    pub fn wall_neighbors(&self, pos: Position) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let neighbor = Position::new(pos.x + dx, pos.y + dy);
                if self.get(neighbor).is_none_or(Cell::is_wall) {
                    count += 1;
                }
            }
        }
        count
    }

    #[must_use]
    pub fn to_ascii_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    pub fn from_ascii_rows<I, S>(rows: I) -> Result<Self, GridParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut width = None;
        let mut height = 0;
        let mut cells = vec![];
        for (row, line) in rows.into_iter().enumerate() {
            let line = line.as_ref();
            let start = cells.len();
            for (column, ch) in line.chars().enumerate() {
                let cell =
                    Cell::from_char(ch).ok_or(GridParseError::InvalidCell { row, column, ch })?;
                cells.push(cell);
            }
            let actual = cells.len() - start;
            let expected = *width.get_or_insert(actual);
            if actual != expected {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected,
                    actual,
                });
            }
            height += 1;
        }
        let width = width.ok_or(GridParseError::Empty)?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_ascii_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_ascii_rows(rows).map_err(serde::de::Error::custom)
    }
}
