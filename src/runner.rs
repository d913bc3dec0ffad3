//! Command runner: spawns shell commands and prints to standard output.

use std::io::{self, Stdout, Write};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Shell used for `exec` steps and clickable areas.
pub const SHELL: &str = "/bin/sh";

/// Carries out the side effects of action steps.
pub trait CommandRunner {
    /// Start `command` in the background. Failures are logged, never fatal.
    fn spawn(&mut self, command: &str);

    /// Write one line of text to standard output.
    fn print(&mut self, text: &str);
}

/// Runs commands through `/bin/sh -c` and prints to a writer (stdout by default).
#[derive(Debug)]
pub struct ShellRunner<W: Write = Stdout> {
    out: W,
    children: Vec<Child>,
}

impl ShellRunner<Stdout> {
    /// Runner printing to the process's standard output.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for ShellRunner<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ShellRunner<W> {
    /// Runner printing to `out`.
    pub fn with_output(out: W) -> Self {
        Self {
            out,
            children: Vec::new(),
        }
    }

    /// Number of spawned commands not yet reaped.
    pub fn running(&mut self) -> usize {
        self.reap();
        self.children.len()
    }

    fn reap(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }

    /// Consume the runner, returning the output writer.
    pub fn into_output(self) -> W {
        self.out
    }
}

impl<W: Write> CommandRunner for ShellRunner<W> {
    fn spawn(&mut self, command: &str) {
        self.reap();
        debug!("spawning '{command}'");
        let spawned = Command::new(SHELL)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            // Own process group: terminal signals aimed at the bar skip children
            .process_group(0)
            .spawn();
        match spawned {
            Ok(child) => self.children.push(child),
            Err(e) => warn!("failed to spawn '{command}': {e}"),
        }
    }

    fn print(&mut self, text: &str) {
        let result = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!("failed to print: {e}");
        }
    }
}
