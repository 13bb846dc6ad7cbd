use std::sync::Arc;

use hashbrown::HashMap;

use super::{Algorithm, AStar, Bfs, Dfs, Dijkstra, SearchError, SearchKind};
use crate::{dims::Dims, grid::Grid};

/// Builds a strategy for the given maze, start and goal.
pub type Constructor = fn(Arc<Grid>, Dims, Dims) -> Algorithm;

/// Maps algorithm names to their constructors.
///
/// Names are stored lowercase and looked up case-insensitively. The registry is a plain value
/// owned by whoever needs it, [`AlgorithmRegistry::default`] knows the four built-in
/// strategies.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    items: HashMap<String, Constructor>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, constructor: Constructor) {
        self.items.insert(name.to_ascii_lowercase(), constructor);
    }

    pub fn get(&self, name: &str) -> Option<Constructor> {
        self.items.get(&name.to_ascii_lowercase()).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.items.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creates the strategy `name` after checking that start and goal lie on the maze.
    pub fn create(
        &self,
        name: &str,
        grid: Arc<Grid>,
        start: Dims,
        goal: Dims,
    ) -> Result<Algorithm, SearchError> {
        if !grid.is_in_bounds(start) || !grid.is_in_bounds(goal) {
            return Err(SearchError::InvalidPositions { start, goal });
        }

        let constructor = self
            .get(name)
            .ok_or_else(|| SearchError::UnknownAlgorithm(name.to_string()))?;

        log::debug!("Creating '{name}' from {start:?} to {goal:?}");
        Ok(constructor(grid, start, goal))
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(SearchKind::Bfs.name(), |grid, start, goal| {
            Algorithm::Bfs(Bfs::new(grid, start, goal))
        });
        registry.register(SearchKind::Dfs.name(), |grid, start, goal| {
            Algorithm::Dfs(Dfs::new(grid, start, goal))
        });
        registry.register(SearchKind::Dijkstra.name(), |grid, start, goal| {
            Algorithm::Dijkstra(Dijkstra::new(grid, start, goal))
        });
        registry.register(SearchKind::AStar.name(), |grid, start, goal| {
            Algorithm::AStar(AStar::new(grid, start, goal))
        });
        registry
    }
}

/// Creates a strategy from a binary maze (`0` path, `1` wall).
///
/// The maze is checked first, then the positions and the algorithm name last.
pub fn create_algorithm(
    kind: &str,
    maze: &[Vec<u8>],
    start: Dims,
    goal: Dims,
) -> Result<Algorithm, SearchError> {
    let grid = Grid::from_rows(maze)?;
    AlgorithmRegistry::default().create(kind, Arc::new(grid), start, goal)
}
