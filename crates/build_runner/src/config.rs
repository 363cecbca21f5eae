use std::path::{Path, PathBuf};

use color_eyre::{eyre::Context, Result};
use serde::Deserialize;

const DEFAULT_COMPILER: &str = r"C:\Program Files\LLVM\bin\clang++.exe";
const DEFAULT_BINARY: &str = "example.exe";
const DEFAULT_SOURCES: &[&str] = &["example.cpp"];
const DEFAULT_OUTPUT_DIR: &str = "build";

/// Everything needed to compile the program.
///
/// Built once at startup, either from the built-in defaults or from a TOML
/// file, and then only read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Path to the compiler executable.
    pub compiler: PathBuf,

    /// File name of the output binary.
    #[serde(rename = "binary")]
    pub binary_name: String,

    /// Source files, relative to the working directory.
    pub sources: Vec<PathBuf>,

    /// Preprocessor definitions, passed as `-D<def>`.
    pub defines: Vec<String>,

    /// Directory the binary is written to, relative to the working directory.
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            binary_name: DEFAULT_BINARY.to_owned(),
            sources: DEFAULT_SOURCES.iter().map(PathBuf::from).collect(),
            defines: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl BuildConfig {
    pub fn from_toml_str(config_toml: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_toml)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config_toml = std::fs::read_to_string(path)
            .with_context(|| format!("error reading config `{}`", path.display()))?;

        Self::from_toml_str(&config_toml)
            .with_context(|| format!("error parsing config `{}`", path.display()))
    }

    /// The `-o` argument. Always uses `/` so the command line doesn't depend on
    /// the host platform.
    pub fn output_path(&self) -> String {
        let dir = self.output_dir.display().to_string();
        let dir = dir.trim_end_matches(['/', '\\']);
        if dir.is_empty() {
            return self.binary_name.clone();
        }

        format!("{dir}/{}", self.binary_name)
    }
}
