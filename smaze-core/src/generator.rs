use std::sync::Arc;

use rand::{seq::SliceRandom as _, thread_rng, Rng as _, SeedableRng as _};

use crate::{
    array::Array2D,
    dims::Dims,
    grid::{CellState, Grid},
};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

pub const MIN_SIZE: usize = 11;
pub const MAX_SIZE: usize = 99;

/// Normalizes requested maze size, so it's odd and in the `[11, 99]` range.
///
/// Sizes below 10 become 11, sizes above 100 become 99, even sizes are rounded up.
pub fn normalize_size(size: i64) -> usize {
    if size < 10 {
        return MIN_SIZE;
    }
    if size > 100 {
        return MAX_SIZE;
    }

    let size = size as usize;
    // 100 is let through by the range check, but would round up past the maximum
    if size % 2 == 0 {
        (size + 1).min(MAX_SIZE)
    } else {
        size
    }
}

/// A wall between two odd cells which Kruskal's algorithm may remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallCandidate {
    pub pos: Dims,
    pub dir: Dims,
}

impl WallCandidate {
    /// Cells on both sides of the wall.
    pub fn sides(&self) -> (Dims, Dims) {
        (self.pos - self.dir, self.pos + self.dir)
    }
}

/// Generates square perfect mazes with randomized Kruskal's algorithm.
///
/// The generator owns the current maze and hands out shared, immutable snapshots of it.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    size: usize,
    seed: Option<u64>,
    last_seed: Option<u64>,
    maze: Option<Arc<Grid>>,
}

impl MazeGenerator {
    pub fn new(size: i64) -> Self {
        Self {
            size: normalize_size(size),
            seed: None,
            last_seed: None,
            maze: None,
        }
    }

    /// Every generation of a seeded generator produces the same maze for the same size.
    pub fn with_seed(size: i64, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(size)
        }
    }

    pub fn generate(&mut self) -> Arc<Grid> {
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Random::seed_from_u64(seed);

        log::debug!("Generating {0}x{0} maze with seed {1}", self.size, seed);

        let maze = Arc::new(Self::build(self.size, &mut rng));
        self.last_seed = Some(seed);
        self.maze = Some(maze.clone());
        maze
    }

    /// Changes the size and regenerates the maze, even if the size didn't change.
    pub fn update_size(&mut self, size: i64) -> Arc<Grid> {
        self.size = normalize_size(size);
        self.generate()
    }

    pub fn maze(&self) -> Option<Arc<Grid>> {
        self.maze.clone()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Seed of the last generated maze.
    pub fn seed(&self) -> Option<u64> {
        self.last_seed
    }

    /// Returns `true` also when there is no maze yet.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.maze.as_ref().map_or(true, |maze| maze.is_wall(x, y))
    }

    pub fn is_path(&self, x: i32, y: i32) -> bool {
        !self.is_wall(x, y)
    }

    pub fn start_position(&self) -> Dims {
        Dims(0, 1)
    }

    pub fn goal_position(&self) -> Dims {
        let size = self.size as i32;
        Dims(size - 1, size - 2)
    }

    /// Runs Kruskal's algorithm on a `size`x`size` grid, `size` is expected to be normalized.
    pub fn build(size: usize, rng: &mut Random) -> Grid {
        let mut grid = Grid::new_filled(size, size, CellState::Wall);
        let mut labels = Array2D::new(0usize, size, size);

        for pos in odd_cells(size) {
            grid.set(pos, CellState::Path);
            labels[pos] = labels.dim_to_idx(pos).unwrap_or_default();
        }

        let mut walls = wall_candidates(size);
        walls.shuffle(rng);

        while let Some(wall) = walls.pop() {
            let (from, to) = wall.sides();
            let (keep, old) = (labels[from], labels[to]);

            if keep == old {
                continue;
            }

            grid.set(wall.pos, CellState::Path);

            for pos in odd_cells(size) {
                if labels[pos] == old {
                    labels[pos] = keep;
                }
            }
        }

        let last = size as i32 - 1;
        grid.set(Dims(0, 1), CellState::Path);
        grid.set(Dims(last, last - 1), CellState::Path);

        grid
    }
}

/// Cells with both coordinates odd, these are the nodes of the spanning tree.
fn odd_cells(size: usize) -> impl Iterator<Item = Dims> {
    let size = size as i32;
    (1..size - 1)
        .step_by(2)
        .flat_map(move |y| (1..size - 1).step_by(2).map(move |x| Dims(x, y)))
}

/// Walls to the right and below every odd cell, unless they lie on the border.
pub fn wall_candidates(size: usize) -> Vec<WallCandidate> {
    let last_inner = size as i32 - 2;
    let mut walls = Vec::new();

    for cell in odd_cells(size) {
        if cell.0 < last_inner {
            walls.push(WallCandidate {
                pos: cell + Dims::EAST,
                dir: Dims::EAST,
            });
        }

        if cell.1 < last_inner {
            walls.push(WallCandidate {
                pos: cell + Dims::SOUTH,
                dir: Dims::SOUTH,
            });
        }
    }

    walls
}
