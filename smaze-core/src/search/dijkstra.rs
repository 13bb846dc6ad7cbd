use std::sync::Arc;

use super::{queue::MinQueue, SearchState, Step, UNREACHED};
use crate::{array::Array2D, dims::Dims, grid::Grid};

/// Dijkstra's algorithm with unit edge weights.
///
/// Improved distances push a new queue entry instead of updating the old one, stale entries
/// are skipped when they come out of the queue.
#[derive(Debug, Clone)]
pub struct Dijkstra {
    pub(crate) state: SearchState,
    distances: Array2D<u32>,
    queue: MinQueue,
}

impl Dijkstra {
    pub fn new(grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        let mut distances = Array2D::new(UNREACHED, grid.width(), grid.height());
        if let Some(d) = distances.get_mut(start) {
            *d = 0;
        }

        let mut queue = MinQueue::new();
        queue.push(0, start);

        Self {
            state: SearchState::new(grid, start, goal),
            distances,
            queue,
        }
    }

    /// Tentative distance from the start, `None` if the cell wasn't reached yet.
    pub fn distance(&self, pos: Dims) -> Option<u32> {
        self.distances.get(pos).copied().filter(|&d| d != UNREACHED)
    }

    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn step(&mut self) -> Step {
        let Some((_, current)) = self.queue.pop() else {
            return self.state.finish_exhausted();
        };

        if self.state.is_visited(current) {
            return Step::skip();
        }

        self.state.mark_visited(current);

        if self.state.is_goal(current) {
            return self.state.finish_found(current);
        }

        let alt = self.distances.get(current).copied().unwrap_or(0).saturating_add(1);
        for neighbor in self.state.valid_neighbors(current) {
            if alt < self.distances[neighbor] {
                self.distances[neighbor] = alt;
                self.state.set_came_from(neighbor, current);
                self.queue.push(alt, neighbor);
            }
        }

        Step::visit(current)
    }
}
