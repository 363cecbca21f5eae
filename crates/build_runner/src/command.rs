use std::fmt;

use crate::BuildConfig;

const DIAGNOSTIC_FLAGS: [&str; 2] = ["-fcolor-diagnostics", "-fansi-escape-codes"];
const DEBUG_SYMBOLS_FLAG: &str = "-g";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Ask the compiler for debug information.
    pub debug_symbols: bool,
}

/// The compiler invocation, handed to the shell as a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    parts: Vec<String>,
}

impl BuildCommand {
    pub fn assemble(config: &BuildConfig, options: BuildOptions) -> Self {
        let mut parts = Vec::with_capacity(
            DIAGNOSTIC_FLAGS.len() + config.sources.len() + config.defines.len() + 4,
        );

        parts.push(format!("\"{}\"", config.compiler.display()));
        parts.extend(DIAGNOSTIC_FLAGS.iter().map(|&flag| flag.to_owned()));

        if options.debug_symbols {
            parts.push(DEBUG_SYMBOLS_FLAG.to_owned());
        }

        parts.extend(config.sources.iter().map(|s| s.display().to_string()));
        parts.extend(config.defines.iter().map(|def| format!("-D{def}")));

        parts.push("-o".to_owned());
        parts.push(config.output_path());

        Self { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn command_line(&self) -> String {
        self.parts.join(" ")
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[test]
fn default_command_line() {
    let cmd = BuildCommand::assemble(&BuildConfig::default(), BuildOptions::default());
    assert_eq!(
        cmd.command_line(),
        r#""C:\Program Files\LLVM\bin\clang++.exe" -fcolor-diagnostics -fansi-escape-codes example.cpp -o build/example.exe"#
    );
}

#[test]
fn debug_flag_precedes_sources() {
    let options = BuildOptions {
        debug_symbols: true,
    };
    let cmd = BuildCommand::assemble(&BuildConfig::default(), options);

    let debug_idx = cmd.parts().iter().position(|p| p == "-g").unwrap();
    let source_idx = cmd.parts().iter().position(|p| p == "example.cpp").unwrap();
    assert_eq!(debug_idx, 3);
    assert!(debug_idx < source_idx);
}

#[test]
fn full_ordering() {
    let config = BuildConfig {
        compiler: "/usr/bin/clang++".into(),
        binary_name: "prog".to_owned(),
        sources: vec!["example.cpp".into(), "Bar.cpp".into()],
        defines: vec!["NDEBUG".to_owned(), "LEVEL=2".to_owned()],
        output_dir: "out".into(),
    };
    let cmd = BuildCommand::assemble(
        &config,
        BuildOptions {
            debug_symbols: true,
        },
    );

    assert_eq!(
        cmd.parts(),
        [
            "\"/usr/bin/clang++\"",
            "-fcolor-diagnostics",
            "-fansi-escape-codes",
            "-g",
            "example.cpp",
            "Bar.cpp",
            "-DNDEBUG",
            "-DLEVEL=2",
            "-o",
            "out/prog",
        ]
    );
    assert_eq!(cmd.to_string(), cmd.command_line());
}

#[test]
fn assembly_is_deterministic() {
    let config = BuildConfig::default();
    let first = BuildCommand::assemble(&config, BuildOptions::default());
    let second = BuildCommand::assemble(&config, BuildOptions::default());
    assert_eq!(first.command_line(), second.command_line());
}
