//! Opening snippet files with an external program.

use log::debug;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Hands a file to the host's "open" action.
pub trait Launcher {
    fn launch(&self, path: &Path) -> io::Result<()>;
}

/// Launches files by running `<program> [args..] <path>` without waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLauncher {
    program: String,
    args: Vec<String>,
}

impl CommandLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    /// Parses a whitespace-separated command line such as `"open -a Preview"`.
    ///
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Launcher for CommandLauncher {
    fn launch(&self, path: &Path) -> io::Result<()> {
        debug!(
            "event=launch module=service status=start program={}",
            self.program
        );
        Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

/// Platform default program for opening files.
pub fn default_launcher_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}
