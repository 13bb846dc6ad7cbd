use std::sync::Arc;

use super::{SearchState, Step};
use crate::{dims::Dims, grid::Grid};

/// Depth-first search. The path is the first one found, not necessarily a shortest one.
#[derive(Debug, Clone)]
pub struct Dfs {
    pub(crate) state: SearchState,
    stack: Vec<Dims>,
}

impl Dfs {
    pub fn new(grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        let mut state = SearchState::new(grid, start, goal);
        state.mark_visited(start);

        Self {
            state,
            stack: vec![start],
        }
    }

    pub fn frontier_len(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn step(&mut self) -> Step {
        let Some(current) = self.stack.pop() else {
            return self.state.finish_exhausted();
        };

        if self.state.is_goal(current) {
            return self.state.finish_found(current);
        }

        for neighbor in self.state.valid_neighbors(current) {
            self.state.mark_visited(neighbor);
            self.state.set_came_from(neighbor, current);
            self.stack.push(neighbor);
        }

        Step::visit(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tests::{assert_valid_path, open_room};

    #[test]
    fn last_pushed_goes_first() {
        let grid = open_room();
        let mut dfs = Dfs::new(grid.clone(), Dims(2, 1), Dims(4, 4));

        assert_eq!(dfs.step().visited, Some(Dims(2, 1)));
        // east, west, north were pushed (south is the pillar), north is on top
        assert_eq!(dfs.frontier_len(), 3);
        assert_eq!(dfs.step().visited, Some(Dims(2, 0)));
    }

    #[test]
    fn finds_some_path() {
        let grid = open_room();
        let mut dfs = Dfs::new(grid.clone(), Dims(0, 0), Dims(4, 4));
        let mut visited = Vec::new();

        let path = loop {
            let step = dfs.step();
            visited.extend(step.visited);
            if let crate::search::Status::Done(path) = step.status {
                break path.unwrap();
            }
        };

        assert_valid_path(&grid, &path, Dims(0, 0), Dims(4, 4));
        for pos in &path {
            assert!(visited.contains(pos) || dfs.state.is_visited(*pos));
        }
    }
}
