//! Console step reporter.
//!
//! Every diagnostic step prints a structured line of the form
//! `[step-or-topic] [STATUS] message`. The reporter renders to any
//! `io::Write` so tests can capture and assert on the output.

use std::fmt;
use std::io::{self, Write};

/// Status tag for a reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step is starting or informational context.
    Info,
    /// Step completed successfully.
    Success,
    /// Step failed.
    Error,
    /// A listed object key.
    File,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            StepStatus::Info => "INFO",
            StepStatus::Success => "SUCCESS",
            StepStatus::Error => "ERROR",
            StepStatus::File => "FILE",
        };
        f.write_str(tag)
    }
}

/// Writes structured step lines to an output sink.
pub struct StepReporter<W: Write> {
    out: W,
}

impl StepReporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> StepReporter<W> {
    /// Create a reporter over an arbitrary sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit one `[step] [STATUS] message` line.
    ///
    /// Write failures to the sink are ignored; diagnostics must not fail
    /// because stdout is closed.
    pub fn step(&mut self, step: &str, status: StepStatus, message: impl fmt::Display) {
        let _ = writeln!(self.out, "[{step}] [{status}] {message}");
    }

    /// Emit a blank separator line.
    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    /// Emit a plain line without step/status framing.
    pub fn plain(&mut self, message: impl fmt::Display) {
        let _ = writeln!(self.out, "{message}");
    }

    /// Consume the reporter and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(f: impl FnOnce(&mut StepReporter<Vec<u8>>)) -> String {
        let mut reporter = StepReporter::new(Vec::new());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_step_line_format() {
        let out = captured(|r| r.step("Step 1", StepStatus::Info, "Connecting..."));
        assert_eq!(out, "[Step 1] [INFO] Connecting...\n");
    }

    #[test]
    fn test_all_status_tags() {
        let out = captured(|r| {
            r.step("a", StepStatus::Info, "m");
            r.step("a", StepStatus::Success, "m");
            r.step("a", StepStatus::Error, "m");
            r.step("a", StepStatus::File, "key.txt");
        });
        let tags: Vec<&str> = out
            .lines()
            .map(|l| l.split(' ').nth(1).unwrap())
            .collect();
        assert_eq!(tags, ["[INFO]", "[SUCCESS]", "[ERROR]", "[FILE]"]);
    }

    #[test]
    fn test_plain_and_blank() {
        let out = captured(|r| {
            r.plain("All files in bucket:");
            r.blank();
        });
        assert_eq!(out, "All files in bucket:\n\n");
    }
}
