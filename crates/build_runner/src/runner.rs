use std::{
    path::Path,
    process::{Command, ExitStatus},
};

use color_eyre::{eyre::Context, Result};
use tracing::{debug, debug_span, info};

use crate::{check_paths, BuildCommand, BuildConfig, BuildOptions, Timer};

/// Runs a single build and returns the compiler's exit code.
///
/// A missing compiler or source file is returned as a [`MissingPath`] error
/// before the output directory is touched or anything is spawned. A compiler
/// that fails is not an error; its exit code is returned as-is.
///
/// [`MissingPath`]: crate::MissingPath
pub fn run(
    config: &BuildConfig,
    options: BuildOptions,
    working_dir: &Path,
    timer: &Timer,
) -> Result<i32> {
    let _span = debug_span!(stringify!(run)).entered();

    {
        let _start = timer.start_check();
        check_paths(config, working_dir)?;
    }

    let command = {
        let _start = timer.start_prepare();
        let output_dir = working_dir.join(&config.output_dir);
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory `{}`", output_dir.display())
        })?;

        BuildCommand::assemble(config, options)
    };

    let command_line = command.command_line();
    println!("{command_line}");

    let status = {
        let _start = timer.start_compile();
        shell_command(&command_line)
            .current_dir(working_dir)
            .status()
            .with_context(|| format!("failed to execute `{command_line}`"))?
    };

    let code = exit_code(status);
    info!(code, "compiler finished");

    Ok(code)
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    // cmd strips one pair of outer quotes from whatever follows /C.
    let mut command = Command::new("cmd");
    command.arg("/C").raw_arg(format!("\"{command_line}\""));
    command
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            debug!(signal, "compiler terminated by signal");
            return 128 + signal;
        }
    }

    1
}
