#![warn(
    clippy::manual_let_else,
    clippy::redundant_else,
    clippy::unnested_or_patterns,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]

use std::path::PathBuf;

use build_runner::{BuildConfig, BuildOptions, MissingPath, Timer};
use clap::Parser;
use color_eyre::Result;
use tracing::{debug, debug_span, Level};

/// Exit status for a missing compiler or source file.
const MISSING_PATH_EXIT: i32 = -1;

#[derive(Debug, Parser)]
#[command(name = "build")]
struct Args {
    /// Generate debug symbols.
    #[arg(long)]
    pdb: bool,

    /// TOML file to read the build configuration from.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory containing the sources. The compiler is run from here.
    #[arg(short = 'C', default_value = ".")]
    working_dir: PathBuf,

    /// Print more to the console
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print how long each phase took.
    #[arg(long = "time")]
    time_phases: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let max_log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(max_log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };

    let options = BuildOptions {
        debug_symbols: args.pdb,
    };
    let timer = Timer::new(args.time_phases);

    let result = {
        let _span = debug_span!("main").entered();
        debug!(?config, ?options);
        build_runner::run(&config, options, &args.working_dir, &timer)
    };

    if args.time_phases {
        timer.print();
    }

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            let Some(missing) = e.downcast_ref::<MissingPath>() else {
                return Err(e);
            };
            println!("Build failed: {missing}");
            MISSING_PATH_EXIT
        }
    };

    std::process::exit(code);
}
