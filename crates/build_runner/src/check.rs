use std::{
    error::Error,
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use crate::BuildConfig;

/// A configured path that wasn't on disk when the build started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPath(PathBuf);

impl MissingPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for MissingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not find {}", self.0.display())
    }
}

impl Error for MissingPath {}

/// Ensures the compiler and every source file exist before anything is spawned.
///
/// Sources are looked up relative to `working_dir`. The first missing path is
/// reported as configured, not as resolved.
pub fn check_paths(config: &BuildConfig, working_dir: &Path) -> Result<(), MissingPath> {
    debug!(compiler = %config.compiler.display(), "checking compiler");
    if !working_dir.join(&config.compiler).exists() {
        return Err(MissingPath(config.compiler.clone()));
    }

    for source in &config.sources {
        trace!(source = %source.display(), "checking source");
        if !working_dir.join(source).exists() {
            return Err(MissingPath(source.clone()));
        }
    }

    Ok(())
}
