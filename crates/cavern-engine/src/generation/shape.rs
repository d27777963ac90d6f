use rand::Rng;

use crate::core::{Cell, Grid};

/// Creates a grid of random noise.
///
/// Each cell independently becomes [`Cell::Wall`] with probability
/// `density_percent / 100` (values above 100 are clamped), otherwise
/// [`Cell::Floor`].
///
/// ```
/// use cavern_engine::{Cell, generation::create_noise_grid};
///
/// let grid = create_noise_grid(5, 5, 0, &mut rand::rng());
/// assert_eq!(grid.count(Cell::Floor), 25);
/// ```
pub fn create_noise_grid<R>(width: usize, height: usize, density_percent: u8, rng: &mut R) -> Grid
where
    R: Rng + ?Sized,
{
    let probability = f64::from(density_percent.min(100)) / 100.0;
    Grid::from_fn(width, height, |_| {
        if rng.random_bool(probability) {
            Cell::Wall
        } else {
            Cell::Floor
        }
    })
}

/// Applies one cellular-automata smoothing pass.
///
/// A cell becomes a wall when at least `wall_neighbor_threshold` of its 8
/// neighbors are walls (out-of-bounds neighbors count as walls), and floor
/// otherwise. The input grid is left untouched.
#[must_use]
pub fn smooth(grid: &Grid, wall_neighbor_threshold: u8) -> Grid {
    Grid::from_fn(grid.width(), grid.height(), |pos| {
        if grid.wall_neighbors(pos) >= wall_neighbor_threshold {
            Cell::Wall
        } else {
            Cell::Floor
        }
    })
}
