use std::{path::PathBuf, time::Duration};

use clap::Parser;
use smaze::{
    app::{self, AppError, Options},
    logging,
    settings::Settings,
};
use smaze_core::search::SearchKind;

#[derive(Parser, Debug)]
#[clap(version, author, about, name = "smaze")]
struct Args {
    #[clap(long, help = "Maze size, normalized to an odd number in 11..=99")]
    size: Option<i64>,
    #[clap(short, long, help = "One of bfs, dfs, dijkstra, astar")]
    algorithm: Option<SearchKind>,
    #[clap(long, help = "Seed for reproducible mazes")]
    seed: Option<u64>,
    #[clap(long, help = "Delay between animation steps in milliseconds")]
    delay_ms: Option<u64>,
    #[clap(long, help = "Stop solving after this many milliseconds")]
    timeout_ms: Option<u64>,
    #[clap(long, action, help = "Only print the result, without animation")]
    no_animate: bool,
    #[clap(long, action, help = "Run all algorithms and compare them")]
    compare: bool,
    #[clap(short, long, action = clap::ArgAction::Count, help = "More logs, can be repeated")]
    verbose: u8,
    #[clap(long, help = "Settings file to use instead of the default one")]
    config: Option<PathBuf>,
    #[clap(short, long, action, help = "Show config path and quit")]
    show_config_path: bool,
    #[clap(long, help = "Show config in debug format and quit")]
    debug_config: bool,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.show_config_path {
        let settings_path = args.config.clone().unwrap_or_else(Settings::default_path);
        if let Some(s) = settings_path.to_str() {
            println!("{}", s);
        } else {
            println!("{:?}", settings_path);
        }
        return Ok(());
    }

    // settings report invalid values through the log
    logging::init(log::LevelFilter::Warn);

    let settings = match args.config.clone() {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };

    if args.debug_config {
        println!("{:#?}", settings);
        return Ok(());
    }

    better_panic::install();

    let level = logging::verbosity_level(args.verbose)
        .unwrap_or_else(|| settings.get_log_level());
    logging::get_logger().set_min_level(level);

    let step_delay_ms = args
        .delay_ms
        .unwrap_or_else(|| settings.get_step_delay_ms());
    let options = Options {
        size: args.size.unwrap_or_else(|| settings.get_maze_size()),
        algorithm: args.algorithm.unwrap_or_else(|| settings.get_algorithm()),
        seed: args.seed,
        step_delay: Duration::from_millis(step_delay_ms),
        timeout: args.timeout_ms.map(Duration::from_millis),
        animate: !args.no_animate,
        compare: args.compare,
        color_scheme: settings.get_color_scheme(),
    };
    log::debug!("{options:?}");

    app::run(&options)
}
