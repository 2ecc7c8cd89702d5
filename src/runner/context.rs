//! Execution context for the generate and execute phases
//!
//! The context carries the resolved configuration, the verbosity level, and
//! an append-only log file for the invoked subcommand. Every message goes to
//! the file; the console only sees what the verbosity allows.

use crate::config::Config;
use colored::Colorize;
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::Write;

/// Verbosity levels for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Execution context shared by both phases
pub struct Context {
    /// Resolved configuration
    pub config: Config,

    /// Verbosity level for console output
    pub verbosity: Verbosity,

    /// Append-only log sink, one file per subcommand under logs_root.
    /// None when the file could not be opened; logging then degrades to
    /// console only instead of failing the phase.
    log: Option<RefCell<File>>,
}

impl Context {
    /// Create a context without a log file (console only)
    pub fn new(config: Config) -> Self {
        Context {
            config,
            verbosity: Verbosity::Normal,
            log: None,
        }
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Attach the log file for a subcommand, `<logs_root>/<command>.log`
    pub fn with_log_for(mut self, command: &str) -> Self {
        let log_path = self.config.logs_root.join(format!("{}.log", command));
        let file = fs::create_dir_all(&self.config.logs_root)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&log_path));
        self.log = file.ok().map(RefCell::new);
        self
    }

    fn log_line(&self, line: &str) {
        if let Some(file) = &self.log {
            // Log write failures are swallowed; the run itself must not die
            // because the disk holding the logs is full.
            let _ = writeln!(file.borrow_mut(), "{}", line);
        }
    }

    /// Progress line, `[+]` prefixed. Shown at Quiet and above.
    pub fn step(&self, message: &str) {
        self.log_line(&format!("[+] {}", message));
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[+]".green(), message);
        }
    }

    /// Fact line, `[-]` prefixed. Shown at Normal and above.
    pub fn detail(&self, message: &str) {
        self.log_line(&format!("[-] {}", message));
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[-]".cyan(), message);
        }
    }

    /// Error line, `[!]` prefixed. Shown at Quiet and above.
    pub fn error(&self, message: &str) {
        self.log_line(&format!("[!] {}", message));
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[!]".red(), message);
        }
    }

    /// Debug line. Shown only at Verbose.
    pub fn debug(&self, message: &str) {
        self.log_line(&format!("[.] {}", message));
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("[.] {}", message);
        }
    }
}
