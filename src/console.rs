//! User interaction seam for deployment passes.
//!
//! The conflict guard and the lifecycle hooks never talk to a terminal
//! directly; they go through the [`Console`] trait. The CLI plugs in
//! [`TermConsole`] for interactive runs or [`AutoConsole`] when `--force`
//! or `--preserve` pre-answers every prompt, and tests plug in scripted
//! implementations to drive decisions deterministically.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Category of a one-line status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Something happened as requested.
    Ok,
    /// Something was skipped or may leave the project incomplete.
    Warning,
}

/// Interaction surface used during a deployment pass.
///
/// Implementations decide how to answer overwrite prompts and where status
/// notices go. The default [`notify`] writes glyph-prefixed lines to stdout.
///
/// [`notify`]: Console::notify
pub trait Console {
    /// Asks a yes/no question and returns `true` for yes.
    ///
    /// `options` is the answer hint shown to the user (e.g. `Y/n`).
    fn confirm(&mut self, message: &str, options: &str) -> Result<bool>;

    /// Emits a one-line status notice.
    fn notify(&mut self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Ok => println!("{} {message}", "✓".green()),
            NoticeKind::Warning => println!("{} {message}", "⚠".yellow()),
        }
    }
}

/// Interactive console reading answers from stdin.
///
/// Answers are trimmed and lowercased; `y` and `yes` mean yes, anything
/// else (including an empty line) means no.
#[derive(Debug, Default)]
pub struct TermConsole;

impl TermConsole {
    /// Creates an interactive console.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Console for TermConsole {
    fn confirm(&mut self, message: &str, options: &str) -> Result<bool> {
        print!("{message} [{options}] ");
        io::stdout().flush().context("Failed to flush prompt to stdout")?;

        let mut response = String::new();
        io::stdin()
            .lock()
            .read_line(&mut response)
            .context("Failed to read confirmation from stdin")?;
        let response = response.trim().to_lowercase();

        Ok(response == "y" || response == "yes")
    }
}

/// Console that answers every prompt with a fixed decision.
///
/// Backs the `--force` (always yes) and `--preserve` (always no) flags, and
/// non-interactive hook invocations where a terminal is unavailable. Status
/// notices still print, so scripted runs report the same skip/overwrite
/// lines an interactive run would.
#[derive(Debug, Clone, Copy)]
pub struct AutoConsole {
    answer: bool,
}

impl AutoConsole {
    /// Creates a console that always answers `answer`.
    #[must_use]
    pub const fn new(answer: bool) -> Self {
        Self { answer }
    }
}

impl Console for AutoConsole {
    fn confirm(&mut self, _message: &str, _options: &str) -> Result<bool> {
        Ok(self.answer)
    }
}
