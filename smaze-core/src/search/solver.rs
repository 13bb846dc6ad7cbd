use std::{thread, time::Duration};

use thiserror::Error;

use super::{Algorithm, Path, SearchKind, Status, Step};
use crate::{
    dims::Dims,
    progress::{Flag, ProgressHandle},
};

#[derive(Debug, Error)]
#[error("Solver was already started")]
pub struct AlreadyStartedError {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SolverState {
    NotStarted,
    Running,
    Finished,
    Stopped,
}

/// Drives one strategy step by step and reports to the host through callbacks.
///
/// The host calls [`Solver::tick`] as often as it likes (or [`Solver::run`]), so it can redraw
/// between steps. `on_step` is called for every newly visited cell, `on_complete` exactly once
/// with the path or `None` when the goal is unreachable. After a stop, neither is called again.
pub struct Solver<'a> {
    algorithm: Algorithm,
    flag: Flag,
    state: SolverState,
    progress: ProgressHandle,
    on_step: Option<Box<dyn FnMut(Dims) + 'a>>,
    on_complete: Option<Box<dyn FnOnce(Option<Path>) + 'a>>,
}

impl<'a> Solver<'a> {
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_progress(algorithm, ProgressHandle::new())
    }

    /// The solver stops, when the progress handle is stopped.
    pub fn with_progress(algorithm: Algorithm, progress: ProgressHandle) -> Self {
        progress.lock().from = algorithm.state().grid().path_cell_count();

        Self {
            algorithm,
            flag: progress.flag().clone(),
            state: SolverState::NotStarted,
            progress,
            on_step: None,
            on_complete: None,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.algorithm.kind()
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SolverState::Running && !self.flag.is_stopped()
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    /// Handle which can stop this solver from elsewhere, even from another thread.
    pub fn stop_flag(&self) -> Flag {
        self.flag.clone()
    }

    pub fn start(
        &mut self,
        on_step: impl FnMut(Dims) + 'a,
        on_complete: impl FnOnce(Option<Path>) + 'a,
    ) -> Result<(), AlreadyStartedError> {
        if self.state != SolverState::NotStarted {
            return Err(AlreadyStartedError {});
        }

        self.on_step = Some(Box::new(on_step));
        self.on_complete = Some(Box::new(on_complete));
        self.state = SolverState::Running;
        log::debug!("Started {}", self.kind().display_name());

        Ok(())
    }

    /// Cooperative cancellation, observed at the beginning of the next tick.
    pub fn stop(&self) {
        self.flag.stop();
    }

    /// Advances the search by one step, returns whether another tick is needed.
    pub fn tick(&mut self) -> bool {
        if self.state != SolverState::Running {
            return false;
        }

        if self.flag.is_stopped() {
            self.halt();
            return false;
        }

        let Step { visited, status } = self.algorithm.step();

        if let Some(pos) = visited {
            log::trace!("{} visited {:?}", self.kind(), pos);
            self.progress.lock().done += 1;
            if let Some(on_step) = self.on_step.as_mut() {
                on_step(pos);
            }
        }

        match status {
            Status::Continue => true,
            // stop may have been requested from inside of `on_step`
            Status::Done(_) if self.flag.is_stopped() => {
                self.halt();
                false
            }
            Status::Done(path) => {
                self.state = SolverState::Finished;
                self.progress.lock().finish();
                self.on_step = None;

                match &path {
                    Some(path) => log::debug!(
                        "{} found path of length {}",
                        self.kind().display_name(),
                        super::path_length(path)
                    ),
                    None => log::debug!("{} found no path", self.kind().display_name()),
                }

                if let Some(on_complete) = self.on_complete.take() {
                    on_complete(path);
                }
                false
            }
        }
    }

    /// Ticks until the search is over or stopped, sleeping `pacing` between the steps.
    pub fn run(&mut self, pacing: Duration) {
        while self.tick() {
            if !pacing.is_zero() {
                thread::sleep(pacing);
            }
        }
    }

    fn halt(&mut self) {
        log::debug!("Stopped {}", self.kind().display_name());
        self.state = SolverState::Stopped;
        self.on_step = None;
        self.on_complete = None;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, sync::Arc};

    use super::*;
    use crate::{
        generator::MazeGenerator,
        grid::Grid,
        search::tests::{assert_valid_path, walled_goal},
    };

    fn maze_solver<'a>(kind: SearchKind) -> (Solver<'a>, Arc<Grid>, Dims, Dims) {
        let mut generator = MazeGenerator::with_seed(21, 11);
        let grid = generator.generate();
        let (start, goal) = (generator.start_position(), generator.goal_position());
        let solver = Solver::new(Algorithm::new(kind, grid.clone(), start, goal));
        (solver, grid, start, goal)
    }

    #[test]
    fn completes_exactly_once() {
        for kind in SearchKind::ALL {
            let steps = RefCell::new(Vec::new());
            let completions = RefCell::new(Vec::new());
            let (mut solver, grid, start, goal) = maze_solver(kind);

            solver
                .start(
                    |pos| steps.borrow_mut().push(pos),
                    |path| completions.borrow_mut().push(path),
                )
                .unwrap();
            solver.run(Duration::ZERO);

            assert_eq!(solver.state(), SolverState::Finished);
            assert!(!solver.tick());
            drop(solver);

            let completions = completions.into_inner();
            assert_eq!(completions.len(), 1);
            let path = completions[0].clone().unwrap();
            assert_valid_path(&grid, &path, start, goal);
            assert_eq!(steps.borrow().last(), Some(&goal));
        }
    }

    #[test]
    fn cannot_start_twice() {
        let (mut solver, ..) = maze_solver(SearchKind::Bfs);
        solver.start(|_| {}, |_| {}).unwrap();
        assert!(solver.start(|_| {}, |_| {}).is_err());
    }

    #[test]
    fn no_ticks_before_start() {
        let (mut solver, ..) = maze_solver(SearchKind::Dfs);
        assert!(!solver.tick());
        assert_eq!(solver.state(), SolverState::NotStarted);
    }

    #[test]
    fn stop_before_completion() {
        for kind in SearchKind::ALL {
            let steps = RefCell::new(0);
            let completed = RefCell::new(false);
            let (mut solver, ..) = maze_solver(kind);
            let flag = solver.stop_flag();
            let (steps_ref, completed_ref) = (&steps, &completed);

            solver
                .start(
                    move |_| {
                        *steps_ref.borrow_mut() += 1;
                        if *steps_ref.borrow() == 3 {
                            flag.stop();
                        }
                    },
                    move |_| *completed_ref.borrow_mut() = true,
                )
                .unwrap();
            solver.run(Duration::ZERO);
            assert!(!solver.tick());
            assert_eq!(solver.state(), SolverState::Stopped);
            drop(solver);

            assert_eq!(*steps.borrow(), 3);
            assert!(!*completed.borrow());
        }
    }

    #[test]
    fn stop_on_goal_step_suppresses_completion() {
        let completed = RefCell::new(false);
        let grid = Arc::new(Grid::from_rows(&[vec![0, 0]]).unwrap());
        let algorithm = Algorithm::new(SearchKind::Bfs, grid, Dims(0, 0), Dims(1, 0));
        let mut solver = Solver::new(algorithm);
        let flag = solver.stop_flag();
        let completed_ref = &completed;

        solver
            .start(
                move |pos| {
                    if pos == Dims(1, 0) {
                        flag.stop();
                    }
                },
                move |_| *completed_ref.borrow_mut() = true,
            )
            .unwrap();
        solver.run(Duration::ZERO);

        assert_eq!(solver.state(), SolverState::Stopped);
        drop(solver);
        assert!(!*completed.borrow());
    }

    #[test]
    fn unreachable_goal_completes_with_none() {
        for kind in SearchKind::ALL {
            let result = RefCell::new(None);
            let algorithm = Algorithm::new(kind, walled_goal(), Dims(0, 1), Dims(3, 3));
            let mut solver = Solver::new(algorithm);
            solver
                .start(|_| {}, |path| *result.borrow_mut() = Some(path))
                .unwrap();
            solver.run(Duration::ZERO);

            assert_eq!(solver.progress().progress().done, 18);
            assert!(solver.progress().progress().is_done);
            drop(solver);
            assert_eq!(result.into_inner(), Some(None), "{kind}");
        }
    }

    #[test]
    fn stopping_progress_stops_solver() {
        let (solver, ..) = maze_solver(SearchKind::AStar);
        let parent = ProgressHandle::new();
        let mut solver = Solver::with_progress(solver.algorithm().clone(), parent.split());
        solver.start(|_| {}, |_| {}).unwrap();

        assert!(solver.tick());
        parent.stop();
        assert!(!solver.is_running());
        assert!(!solver.tick());
        assert_eq!(solver.state(), SolverState::Stopped);
        assert_eq!(parent.progress().done, 1);
    }
}
