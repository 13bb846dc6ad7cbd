use std::{cell::RefCell, io, thread, time::Duration};

use smaze_core::{
    generator,
    progress::{Flag, ProgressHandle},
    search::{path_length, AlreadyStartedError, SearchError, SearchKind},
};
use thiserror::Error;

use crate::{
    compare,
    renderer::{Frame, Renderer},
    session::{format_time, Session, SolveReport},
    settings::{ColorScheme, SettingsError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    AlreadyStarted(#[from] AlreadyStartedError),
}

/// Everything a single run needs, merged from the command line and the settings.
#[derive(Debug, Clone)]
pub struct Options {
    pub size: i64,
    pub algorithm: SearchKind,
    pub seed: Option<u64>,
    pub step_delay: Duration,
    pub timeout: Option<Duration>,
    pub animate: bool,
    pub compare: bool,
    pub color_scheme: ColorScheme,
}

pub fn run(options: &Options) -> Result<(), AppError> {
    let mut session = Session::new(options.size, options.seed);
    if let Some(notice) = size_notice(options.size, session.size()) {
        log::warn!("{notice}");
    }
    log::info!(
        "Generated {0}x{0} maze, seed {1:?}",
        session.size(),
        session.seed()
    );

    if options.compare {
        return run_compare(&session, options);
    }

    let solver = session.prepare_solve(options.algorithm)?;
    if let Some(timeout) = options.timeout {
        spawn_watchdog(solver.stop_flag(), timeout);
    }

    let frame = RefCell::new(Frame::new(
        session.grid(),
        session.player(),
        session.goal(),
    ));

    let report = if options.animate {
        let mut renderer = Renderer::new(options.color_scheme.clone())?;
        renderer.show(&frame.borrow(), options.algorithm.display_name())?;

        let report = session.run_solver(solver, options.step_delay, |pos| {
            frame.borrow_mut().mark_visited(pos);
            if let Err(err) = renderer.update(&frame.borrow(), pos) {
                log::warn!("Cannot draw {pos:?}: {err}");
            }
        })?;

        if let Some(path) = &report.path {
            frame.borrow_mut().mark_solution(path);
        }
        renderer.show(&frame.borrow(), &summary(&report))?;
        thread::sleep(options.step_delay.max(Duration::from_millis(500)));
        report
    } else {
        let report = session.run_solver(solver, Duration::ZERO, |pos| {
            frame.borrow_mut().mark_visited(pos)
        })?;
        if let Some(path) = &report.path {
            frame.borrow_mut().mark_solution(path);
        }
        report
    };

    frame
        .borrow()
        .write(&mut io::stdout(), &options.color_scheme)?;
    println!("{}", summary(&report));

    Ok(())
}

fn run_compare(session: &Session, options: &Options) -> Result<(), AppError> {
    let progress = ProgressHandle::new();
    if let Some(timeout) = options.timeout {
        spawn_watchdog(progress.flag().clone(), timeout);
    }

    let reports = compare::compare(
        session.grid().clone(),
        session.start(),
        session.goal(),
        &progress,
    )?;
    print!("{}", compare::format_table(&reports));

    Ok(())
}

/// Stops the run once the time budget is used up.
fn spawn_watchdog(flag: Flag, timeout: Duration) {
    thread::spawn(move || {
        thread::sleep(timeout);
        if !flag.is_stopped() {
            log::info!("Time budget of {timeout:?} used up, stopping");
            flag.stop();
        }
    });
}

/// Tells the user the requested size was normalized, `None` when it was used as is.
pub fn size_notice(requested: i64, actual: usize) -> Option<String> {
    (requested != actual as i64).then(|| {
        format!(
            "Size adjusted to {actual} (must be odd, {}-{})",
            generator::MIN_SIZE,
            generator::MAX_SIZE
        )
    })
}

pub fn summary(report: &SolveReport) -> String {
    let result = match (&report.path, report.stopped) {
        (_, true) => "stopped".to_string(),
        (Some(path), false) => format!("path length {}", path_length(path)),
        (None, false) => "no path found".to_string(),
    };

    format!(
        "{}: {}, visited {}, {}",
        report.kind.display_name(),
        result,
        report.visited,
        format_time(report.elapsed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use smaze_core::dims::Dims;

    fn report(path: Option<Vec<Dims>>, stopped: bool) -> SolveReport {
        SolveReport {
            kind: SearchKind::Dijkstra,
            path,
            visited: 42,
            stopped,
            elapsed: Duration::from_millis(250),
        }
    }

    #[test]
    fn summaries() {
        assert_eq!(
            summary(&report(Some(vec![Dims(0, 1), Dims(1, 1), Dims(2, 1)]), false)),
            "Dijkstra's Algorithm: path length 2, visited 42, Time: 0.25s"
        );
        assert_eq!(
            summary(&report(None, false)),
            "Dijkstra's Algorithm: no path found, visited 42, Time: 0.25s"
        );
        assert!(summary(&report(None, true)).contains("stopped"));
    }

    #[test]
    fn size_notices() {
        assert_eq!(size_notice(25, 25), None);
        assert_eq!(
            size_notice(24, generator::normalize_size(24)),
            Some("Size adjusted to 25 (must be odd, 11-99)".to_string())
        );
        assert_eq!(
            size_notice(500, generator::normalize_size(500)),
            Some("Size adjusted to 99 (must be odd, 11-99)".to_string())
        );
    }

    #[test]
    fn watchdog_stops_flag() {
        let flag = Flag::new();
        spawn_watchdog(flag.clone(), Duration::from_millis(10));
        for _ in 0..200 {
            if flag.is_stopped() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("watchdog didn't stop the flag");
    }
}
