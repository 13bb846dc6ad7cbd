use std::{collections::VecDeque, sync::Arc};

use super::{SearchState, Step};
use crate::{dims::Dims, grid::Grid};

/// Breadth-first search, finds a shortest path.
///
/// Cells are marked visited when queued, so every cell is queued once at its true depth.
#[derive(Debug, Clone)]
pub struct Bfs {
    pub(crate) state: SearchState,
    queue: VecDeque<Dims>,
}

impl Bfs {
    pub fn new(grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        let mut state = SearchState::new(grid, start, goal);
        state.mark_visited(start);

        Self {
            state,
            queue: VecDeque::from([start]),
        }
    }

    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn step(&mut self) -> Step {
        let Some(current) = self.queue.pop_front() else {
            return self.state.finish_exhausted();
        };

        if self.state.is_goal(current) {
            return self.state.finish_found(current);
        }

        for neighbor in self.state.valid_neighbors(current) {
            self.state.mark_visited(neighbor);
            self.state.set_came_from(neighbor, current);
            self.queue.push_back(neighbor);
        }

        Step::visit(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{tests::open_room, Status};

    #[test]
    fn visits_in_rings() {
        let mut bfs = Bfs::new(open_room(), Dims(0, 0), Dims(4, 4));

        let order: Vec<_> = (0..3).filter_map(|_| bfs.step().visited).collect();
        // east is queued before south
        assert_eq!(order, vec![Dims(0, 0), Dims(1, 0), Dims(0, 1)]);

        let depths: Vec<_> = std::iter::from_fn(|| {
            let step = bfs.step();
            (!step.is_done()).then(|| step.visited.map(|p| p.manhattan(Dims(0, 0))))
        })
        .flatten()
        .collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn goal_is_tested_on_dequeue() {
        let mut bfs = Bfs::new(open_room(), Dims(0, 0), Dims(1, 0));

        // the goal gets queued by the first step, but the search is not over yet
        let first = bfs.step();
        assert_eq!(first.status, Status::Continue);
        assert_eq!(bfs.frontier_len(), 2);

        let second = bfs.step();
        assert_eq!(second.visited, Some(Dims(1, 0)));
        assert_eq!(second.status, Status::Done(Some(vec![Dims(0, 0), Dims(1, 0)])));
    }
}
