mod astar;
mod bfs;
mod dfs;
mod dijkstra;
pub mod factory;
mod queue;
pub mod solver;

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{array::Array2D, dims::Dims, grid::Grid};

pub use astar::AStar;
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use dijkstra::Dijkstra;
pub use factory::{create_algorithm, AlgorithmRegistry, Constructor};
pub use solver::{AlreadyStartedError, Solver, SolverState};

/// Cells from start to goal, both inclusive.
pub type Path = Vec<Dims>;

/// Cost of a cell which wasn't reached yet.
pub(crate) const UNREACHED: u32 = u32::MAX;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid maze format: {0}")]
    InvalidMazeFormat(String),
    #[error("Invalid start or goal positions: start {start:?}, goal {goal:?}")]
    InvalidPositions { start: Dims, goal: Dims },
    #[error("Unknown algorithm type: {0}")]
    UnknownAlgorithm(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::Bfs,
        SearchKind::Dfs,
        SearchKind::Dijkstra,
        SearchKind::AStar,
    ];

    /// Name used to select the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            SearchKind::Bfs => "bfs",
            SearchKind::Dfs => "dfs",
            SearchKind::Dijkstra => "dijkstra",
            SearchKind::AStar => "astar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SearchKind::Bfs => "Breadth-First Search",
            SearchKind::Dfs => "Depth-First Search",
            SearchKind::Dijkstra => "Dijkstra's Algorithm",
            SearchKind::AStar => "A* Algorithm",
        }
    }

    /// Whether the returned path is always a shortest one.
    pub fn is_optimal(self) -> bool {
        !matches!(self, SearchKind::Dfs)
    }
}

impl FromStr for SearchKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SearchError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Cell which became visited in this step, `None` for skipped stale entries and for the
    /// final step of a search, which ran out of cells.
    pub visited: Option<Dims>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Continue,
    /// The search is over, `None` means there is no path from start to goal.
    Done(Option<Path>),
}

impl Step {
    fn visit(pos: Dims) -> Self {
        Self {
            visited: Some(pos),
            status: Status::Continue,
        }
    }

    fn skip() -> Self {
        Self {
            visited: None,
            status: Status::Continue,
        }
    }

    fn exhausted() -> Self {
        Self {
            visited: None,
            status: Status::Done(None),
        }
    }

    fn found(pos: Dims, path: Path) -> Self {
        Self {
            visited: Some(pos),
            status: Status::Done(Some(path)),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, Status::Done(_))
    }
}

/// Bookkeeping shared by all of the strategies.
#[derive(Debug, Clone)]
pub struct SearchState {
    grid: Arc<Grid>,
    start: Dims,
    goal: Dims,
    visited: Array2D<bool>,
    came_from: Array2D<Option<Dims>>,
    finished: bool,
}

impl SearchState {
    pub fn new(grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        let (w, h) = (grid.width(), grid.height());
        Self {
            grid,
            start,
            goal,
            visited: Array2D::new(false, w, h),
            came_from: Array2D::new(None, w, h),
            finished: false,
        }
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn start(&self) -> Dims {
        self.start
    }

    pub fn goal(&self) -> Dims {
        self.goal
    }

    pub fn is_goal(&self, pos: Dims) -> bool {
        pos == self.goal
    }

    pub fn is_visited(&self, pos: Dims) -> bool {
        self.visited.get(pos).copied().unwrap_or(false)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn mark_visited(&mut self, pos: Dims) {
        if let Some(visited) = self.visited.get_mut(pos) {
            *visited = true;
        }
    }

    pub(crate) fn set_came_from(&mut self, pos: Dims, from: Dims) {
        self.came_from[pos] = Some(from);
    }

    /// In bounds, open and not visited yet.
    pub fn is_valid_move(&self, pos: Dims) -> bool {
        self.grid.is_path_at(pos) && !self.is_visited(pos)
    }

    pub fn valid_neighbors(&self, pos: Dims) -> SmallVec<[Dims; 4]> {
        let mut neighbors = Grid::neighbors(pos);
        neighbors.retain(|n| self.is_valid_move(*n));
        neighbors
    }

    pub fn reconstruct_path(&self) -> Path {
        reconstruct_path(&self.came_from, self.goal)
    }

    /// Finishes the search with the path to `pos`, which has to be the goal.
    pub(crate) fn finish_found(&mut self, pos: Dims) -> Step {
        self.finished = true;
        Step::found(pos, self.reconstruct_path())
    }

    pub(crate) fn finish_exhausted(&mut self) -> Step {
        self.finished = true;
        Step::exhausted()
    }
}

/// Walks the back-pointers from `goal` to the cell without one, then reverses.
pub fn reconstruct_path(came_from: &Array2D<Option<Dims>>, goal: Dims) -> Path {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(prev) = came_from.get(current).copied().flatten() {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    path
}

/// Number of moves along the path, `0` for a single cell or empty path.
pub fn path_length(path: &[Dims]) -> usize {
    path.len().saturating_sub(1)
}

/// One of the four strategies, selected at runtime.
#[derive(Debug, Clone)]
pub enum Algorithm {
    Bfs(Bfs),
    Dfs(Dfs),
    Dijkstra(Dijkstra),
    AStar(AStar),
}

impl Algorithm {
    pub fn new(kind: SearchKind, grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        match kind {
            SearchKind::Bfs => Algorithm::Bfs(Bfs::new(grid, start, goal)),
            SearchKind::Dfs => Algorithm::Dfs(Dfs::new(grid, start, goal)),
            SearchKind::Dijkstra => Algorithm::Dijkstra(Dijkstra::new(grid, start, goal)),
            SearchKind::AStar => Algorithm::AStar(AStar::new(grid, start, goal)),
        }
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            Algorithm::Bfs(_) => SearchKind::Bfs,
            Algorithm::Dfs(_) => SearchKind::Dfs,
            Algorithm::Dijkstra(_) => SearchKind::Dijkstra,
            Algorithm::AStar(_) => SearchKind::AStar,
        }
    }

    /// Processes one frontier element.
    ///
    /// Once a step returned [`Status::Done`], any further step returns `Done(None)` and
    /// doesn't visit anything.
    pub fn step(&mut self) -> Step {
        if self.state().is_finished() {
            return Step::exhausted();
        }

        match self {
            Algorithm::Bfs(a) => a.step(),
            Algorithm::Dfs(a) => a.step(),
            Algorithm::Dijkstra(a) => a.step(),
            Algorithm::AStar(a) => a.step(),
        }
    }

    /// Steps until the search is over, calling `on_step` for every visited cell.
    pub fn run_to_end(&mut self, mut on_step: impl FnMut(Dims)) -> Option<Path> {
        loop {
            let Step { visited, status } = self.step();
            if let Some(pos) = visited {
                on_step(pos);
            }
            if let Status::Done(path) = status {
                return path;
            }
        }
    }

    pub fn state(&self) -> &SearchState {
        match self {
            Algorithm::Bfs(a) => &a.state,
            Algorithm::Dfs(a) => &a.state,
            Algorithm::Dijkstra(a) => &a.state,
            Algorithm::AStar(a) => &a.state,
        }
    }
}
