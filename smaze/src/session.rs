use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

use pausable_clock::{PausableClock, PausableInstant};
use smaze_core::{
    dims::Dims,
    generator::MazeGenerator,
    grid::Grid,
    progress::Flag,
    search::{AlgorithmRegistry, AlreadyStartedError, Path, SearchError, SearchKind, Solver},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked,
    Moved(Dims),
    Won,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub kind: SearchKind,
    /// `None` when there is no path, or the solve was stopped.
    pub path: Option<Path>,
    pub visited: usize,
    pub stopped: bool,
    pub elapsed: Duration,
}

/// One maze with a player in it, and at most one solve running at a time.
pub struct Session {
    generator: MazeGenerator,
    registry: AlgorithmRegistry,
    maze: Arc<Grid>,
    player: Dims,
    active: Option<Flag>,
    clock: Option<PausableClock>,
    started: Option<PausableInstant>,
}

impl Session {
    pub fn new(size: i64, seed: Option<u64>) -> Self {
        let mut generator = match seed {
            Some(seed) => MazeGenerator::with_seed(size, seed),
            None => MazeGenerator::new(size),
        };
        let maze = generator.generate();
        let player = generator.start_position();

        Self {
            generator,
            registry: AlgorithmRegistry::default(),
            maze,
            player,
            active: None,
            clock: None,
            started: None,
        }
    }

    pub fn generate_new_maze(&mut self) -> Arc<Grid> {
        self.maze = self.generator.generate();
        self.reset();
        self.maze.clone()
    }

    pub fn update_maze_size(&mut self, size: i64) -> Arc<Grid> {
        self.maze = self.generator.update_size(size);
        self.reset();
        self.maze.clone()
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.maze
    }

    pub fn size(&self) -> usize {
        self.generator.size()
    }

    pub fn seed(&self) -> Option<u64> {
        self.generator.seed()
    }

    pub fn player(&self) -> Dims {
        self.player
    }

    pub fn start(&self) -> Dims {
        self.generator.start_position()
    }

    pub fn goal(&self) -> Dims {
        self.generator.goal_position()
    }

    /// Stops the solve, puts the player back to the entry and clears the timer.
    pub fn reset(&mut self) {
        self.stop_solving();
        self.player = self.generator.start_position();
        self.clock = None;
        self.started = None;
    }

    /// The player can't move while a solve from its position is running.
    pub fn move_player(&mut self, dir: Dims) -> MoveOutcome {
        let next = self.player + dir;
        if self.is_solving() || !self.maze.is_path_at(next) {
            return MoveOutcome::Blocked;
        }

        self.player = next;
        if next == self.goal() {
            log::info!("Player reached the goal");
            self.pause_timer();
            return MoveOutcome::Won;
        }

        MoveOutcome::Moved(next)
    }

    /// Creates a solver from the player to the goal, stopping the previous one.
    pub fn prepare_solve<'a>(&mut self, kind: SearchKind) -> Result<Solver<'a>, SearchError> {
        self.stop_solving();

        let algorithm =
            self.registry
                .create(kind.name(), self.maze.clone(), self.player, self.goal())?;
        let solver = Solver::new(algorithm);

        self.active = Some(solver.stop_flag());
        let clock = PausableClock::default();
        self.started = Some(clock.now());
        self.clock = Some(clock);

        Ok(solver)
    }

    /// Runs the solver to its end, or until it's stopped, pausing `pacing` between the steps.
    pub fn run_solver<'a>(
        &mut self,
        mut solver: Solver<'a>,
        pacing: Duration,
        on_step: impl FnMut(Dims) + 'a,
    ) -> Result<SolveReport, AlreadyStartedError> {
        let kind = solver.kind();
        let flag = solver.stop_flag();
        let result = Rc::new(RefCell::new(None));

        let sink = result.clone();
        solver.start(on_step, move |path| *sink.borrow_mut() = Some(path))?;
        solver.run(pacing);

        let visited = solver.progress().progress().done;
        drop(solver);

        if self.active.as_ref() == Some(&flag) {
            self.active = None;
            self.pause_timer();
        }

        let outcome = result.borrow_mut().take();
        Ok(SolveReport {
            kind,
            stopped: outcome.is_none(),
            path: outcome.flatten(),
            visited,
            elapsed: self.elapsed().unwrap_or_default(),
        })
    }

    pub fn stop_solving(&mut self) {
        if let Some(flag) = self.active.take() {
            flag.stop();
            self.pause_timer();
        }
    }

    pub fn is_solving(&self) -> bool {
        self.active.as_ref().is_some_and(|flag| !flag.is_stopped())
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.clock
            .as_ref()
            .zip(self.started)
            .map(|(clock, start)| start.elapsed(clock))
    }

    fn pause_timer(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.pause();
        }
    }
}

pub fn format_time(elapsed: Duration) -> String {
    format!("Time: {:.2}s", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session() {
        let session = Session::new(20, Some(1));
        assert_eq!(session.size(), 21);
        assert_eq!(session.player(), Dims(0, 1));
        assert_eq!(session.goal(), Dims(20, 19));
        assert!(!session.is_solving());
        assert_eq!(session.elapsed(), None);
    }

    #[test]
    fn player_moves() {
        let mut session = Session::new(11, Some(3));
        assert_eq!(session.move_player(Dims::WEST), MoveOutcome::Blocked);
        assert_eq!(session.move_player(Dims::NORTH), MoveOutcome::Blocked);
        assert_eq!(session.move_player(Dims::EAST), MoveOutcome::Moved(Dims(1, 1)));
        assert_eq!(session.player(), Dims(1, 1));

        session.reset();
        assert_eq!(session.player(), Dims(0, 1));
    }

    #[test]
    fn no_moves_while_solving() {
        let mut session = Session::new(11, Some(3));
        let solver = session.prepare_solve(SearchKind::Bfs).unwrap();

        assert_eq!(session.move_player(Dims::EAST), MoveOutcome::Blocked);
        assert_eq!(session.player(), Dims(0, 1));

        let report = session.run_solver(solver, Duration::ZERO, |_| {}).unwrap();
        assert_eq!(report.path.unwrap().first(), Some(&Dims(0, 1)));
        assert_eq!(session.move_player(Dims::EAST), MoveOutcome::Moved(Dims(1, 1)));
    }

    #[test]
    fn walking_the_solution_wins() {
        let mut session = Session::new(15, Some(8));
        let solver = session.prepare_solve(SearchKind::Bfs).unwrap();
        let path = session
            .run_solver(solver, Duration::ZERO, |_| {})
            .unwrap()
            .path
            .unwrap();

        let moves: Vec<_> = path.windows(2).map(|w| w[1] - w[0]).collect();
        let (last, rest) = moves.split_last().unwrap();
        for dir in rest {
            assert!(matches!(session.move_player(*dir), MoveOutcome::Moved(_)));
        }
        assert_eq!(session.move_player(*last), MoveOutcome::Won);
    }

    #[test]
    fn solve_from_player_position() {
        let mut session = Session::new(21, Some(4));
        session.move_player(Dims::EAST);

        let solver = session.prepare_solve(SearchKind::AStar).unwrap();
        assert!(session.is_solving());
        assert_eq!(solver.algorithm().state().start(), Dims(1, 1));

        let mut steps = 0;
        let report = session
            .run_solver(solver, Duration::ZERO, |_| steps += 1)
            .unwrap();
        assert!(!session.is_solving());
        assert!(!report.stopped);
        assert_eq!(report.kind, SearchKind::AStar);
        assert_eq!(report.visited, steps);

        let path = report.path.unwrap();
        assert_eq!(path.first(), Some(&Dims(1, 1)));
        assert_eq!(path.last(), Some(&session.goal()));
        assert!(session.elapsed().is_some());
    }

    #[test]
    fn new_solve_stops_previous() {
        let mut session = Session::new(21, Some(4));
        let first = session.prepare_solve(SearchKind::Dfs).unwrap();
        let flag = first.stop_flag();

        let second = session.prepare_solve(SearchKind::Bfs).unwrap();
        assert!(flag.is_stopped());
        assert!(session.is_solving());

        let report = session.run_solver(first, Duration::ZERO, |_| {}).unwrap();
        assert!(report.stopped);
        assert_eq!(report.path, None);
        assert_eq!(report.visited, 0);
        assert!(session.is_solving());

        let report = session.run_solver(second, Duration::ZERO, |_| {}).unwrap();
        assert!(!report.stopped);
        assert!(!session.is_solving());
    }

    #[test]
    fn regenerating_stops_and_resets() {
        let mut session = Session::new(21, None);
        session.move_player(Dims::EAST);
        let solver = session.prepare_solve(SearchKind::Dijkstra).unwrap();

        let grid = session.update_maze_size(31);
        assert!(solver.stop_flag().is_stopped());
        assert!(!session.is_solving());
        assert_eq!(grid.size(), Dims(31, 31));
        assert_eq!(session.player(), session.start());
        assert_eq!(session.elapsed(), None);

        let old = session.grid().clone();
        session.generate_new_maze();
        assert!(!Arc::ptr_eq(&old, session.grid()));
    }

    #[test]
    fn time_format() {
        assert_eq!(format_time(Duration::ZERO), "Time: 0.00s");
        assert_eq!(format_time(Duration::from_millis(1234)), "Time: 1.23s");
        assert_eq!(format_time(Duration::from_secs(75)), "Time: 75.00s");
    }
}
