use std::{
    fmt::Write as _,
    sync::Arc,
    time::{Duration, Instant},
};

use rayon::prelude::*;
use smaze_core::{
    dims::Dims,
    grid::Grid,
    progress::ProgressHandle,
    search::{path_length, AlreadyStartedError, Algorithm, SearchKind, Solver},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: SearchKind,
    pub path_length: Option<usize>,
    pub visited: usize,
    pub stopped: bool,
    pub elapsed: Duration,
}

/// Runs all of the strategies on the same maze in parallel, each gets its own child of
/// `progress`, so stopping it stops all of them.
pub fn compare(
    grid: Arc<Grid>,
    start: Dims,
    goal: Dims,
    progress: &ProgressHandle,
) -> Result<Vec<Report>, AlreadyStartedError> {
    SearchKind::ALL
        .par_iter()
        .map(|&kind| {
            let mut result = None;
            let algorithm = Algorithm::new(kind, grid.clone(), start, goal);
            let mut solver = Solver::with_progress(algorithm, progress.split());

            let begin = Instant::now();
            solver.start(|_| {}, |path| result = Some(path))?;
            solver.run(Duration::ZERO);
            let elapsed = begin.elapsed();

            let visited = solver.progress().progress().done;
            drop(solver);

            Ok(Report {
                kind,
                path_length: result.clone().flatten().map(|path| path_length(&path)),
                visited,
                stopped: result.is_none(),
                elapsed,
            })
        })
        .collect()
}

pub fn format_table(reports: &[Report]) -> String {
    let mut table = format!(
        "{:<22} {:>8} {:>8} {:>10}\n",
        "Algorithm", "Length", "Visited", "Time"
    );

    for report in reports {
        let length = match (report.stopped, report.path_length) {
            (true, _) => "stopped".to_string(),
            (false, Some(len)) => len.to_string(),
            (false, None) => "none".to_string(),
        };
        let _ = writeln!(
            table,
            "{:<22} {:>8} {:>8} {:>8.2}ms",
            report.kind.display_name(),
            length,
            report.visited,
            report.elapsed.as_secs_f64() * 1000.0
        );
    }

    table
}
