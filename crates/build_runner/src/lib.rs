#![warn(
    clippy::manual_let_else,
    clippy::redundant_else,
    clippy::unnested_or_patterns,
    clippy::uninlined_format_args,
    clippy::match_same_arms
)]

mod check;
mod command;
mod config;
mod runner;
mod timer;

pub use check::{check_paths, MissingPath};
pub use command::{BuildCommand, BuildOptions};
pub use config::BuildConfig;
pub use runner::run;
pub use timer::{Timer, TimerHandle};
