use tracing::debug;

use crate::core::Grid;

use super::shape;

/// Snapshots of a grid across smoothing iterations.
///
/// Index `0` is the initial (noise) grid and index `i` is the grid after `i`
/// smoothing passes. A cursor selects the current snapshot:
///
/// - [`forward`](Self::forward) moves to the next snapshot, computing it only when the
///   cursor is at the newest one and replaying the cached snapshot otherwise
/// - [`back`](Self::back) moves to the previous snapshot
///
/// Cached snapshots are never recomputed, so replaying forward after moving back
/// ignores the threshold passed in. The history only shrinks through
/// [`reset`](Self::reset).
///
/// # Example
///
/// ```
/// use cavern_engine::{Cell, Grid, generation::GridHistory};
///
/// let mut history = GridHistory::new(Grid::filled(4, 4, Cell::Floor));
/// history.forward(3);
/// history.forward(3);
/// assert_eq!(history.cursor(), 2);
///
/// history.back();
/// assert_eq!(history.cursor(), 1);
/// assert_eq!(history.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GridHistory {
    snapshots: Vec<Grid>,
    cursor: usize,
}

impl GridHistory {
    #[must_use]
    pub fn new(initial: Grid) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> &Grid {
        &self.snapshots[self.cursor]
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of stored snapshots, including the initial grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Grid> {
        self.snapshots.get(index)
    }

    #[must_use]
    pub fn snapshots(&self) -> &[Grid] {
        &self.snapshots
    }

    #[must_use]
    pub fn is_at_latest(&self) -> bool {
        self.cursor + 1 == self.snapshots.len()
    }

    /// Advances the cursor by one smoothing iteration.
    pub fn forward(&mut self, wall_neighbor_threshold: u8) -> &Grid {
        if self.is_at_latest() {
            let next = shape::smooth(self.current(), wall_neighbor_threshold);
            self.snapshots.push(next);
            debug!(iteration = self.snapshots.len() - 1, "computed smoothing snapshot");
        }
        self.cursor += 1;
        self.current()
    }

    /// Moves the cursor back one iteration.
    ///
    /// Returns `None` and stays put when already at the initial grid.
    pub fn back(&mut self) -> Option<&Grid> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.current())
    }

    /// Moves forward until the cursor reaches `iteration`.
    ///
    /// Moving backwards is done with [`back`](Self::back); if the cursor is already
    /// past `iteration` this does nothing.
    pub fn advance_to(&mut self, iteration: usize, wall_neighbor_threshold: u8) -> &Grid {
        while self.cursor < iteration {
            self.forward(wall_neighbor_threshold);
        }
        self.current()
    }

    /// Discards every snapshot and starts over from `initial`.
    pub fn reset(&mut self, initial: Grid) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }

    #[must_use]
    pub fn into_current(mut self) -> Grid {
        self.snapshots.swap_remove(self.cursor)
    }
}
