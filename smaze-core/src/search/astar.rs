use std::sync::Arc;

use super::{queue::MinQueue, SearchState, Step, UNREACHED};
use crate::{array::Array2D, dims::Dims, grid::Grid};

/// A* with the Manhattan distance to the goal as heuristic.
///
/// The heuristic never overestimates on a unit cost grid and is consistent, so the first time
/// the goal is taken out of the open set its path is a shortest one.
#[derive(Debug, Clone)]
pub struct AStar {
    pub(crate) state: SearchState,
    g_score: Array2D<u32>,
    f_score: Array2D<u32>,
    open: MinQueue,
}

impl AStar {
    pub fn new(grid: Arc<Grid>, start: Dims, goal: Dims) -> Self {
        let (w, h) = (grid.width(), grid.height());
        let mut g_score = Array2D::new(UNREACHED, w, h);
        let mut f_score = Array2D::new(UNREACHED, w, h);

        let start_f = start.manhattan(goal);
        if let Some(g) = g_score.get_mut(start) {
            *g = 0;
        }
        if let Some(f) = f_score.get_mut(start) {
            *f = start_f;
        }

        let mut open = MinQueue::new();
        open.push(start_f, start);

        Self {
            state: SearchState::new(grid, start, goal),
            g_score,
            f_score,
            open,
        }
    }

    pub fn heuristic(&self, pos: Dims) -> u32 {
        pos.manhattan(self.state.goal())
    }

    pub fn g_score(&self, pos: Dims) -> Option<u32> {
        self.g_score.get(pos).copied().filter(|&g| g != UNREACHED)
    }

    pub fn f_score(&self, pos: Dims) -> Option<u32> {
        self.f_score.get(pos).copied().filter(|&f| f != UNREACHED)
    }

    pub fn frontier_len(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn step(&mut self) -> Step {
        let Some((_, current)) = self.open.pop() else {
            return self.state.finish_exhausted();
        };

        if self.state.is_visited(current) {
            return Step::skip();
        }

        self.state.mark_visited(current);

        if self.state.is_goal(current) {
            return self.state.finish_found(current);
        }

        let tentative = self.g_score.get(current).copied().unwrap_or(0).saturating_add(1);
        for neighbor in self.state.valid_neighbors(current) {
            if tentative < self.g_score[neighbor] {
                let f = tentative + self.heuristic(neighbor);
                self.state.set_came_from(neighbor, current);
                self.g_score[neighbor] = tentative;
                self.f_score[neighbor] = f;
                self.open.push(f, neighbor);
            }
        }

        Step::visit(current)
    }
}
