//! The global output shell.

use super::style::{ERROR, NOTE, STATUS, WARN};
use std::{
    fmt,
    io::{self, Write},
    sync::{Mutex, MutexGuard, PoisonError},
};

static GLOBAL_SHELL: Mutex<Shell> = Mutex::new(Shell::new());

/// When to color the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color if the output stream is a terminal that supports it.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl From<ColorChoice> for anstream::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// How much the shell prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only command output and errors.
    Quiet,
    /// Command output, status lines and warnings.
    #[default]
    Normal,
    /// Everything, including notes.
    Verbose,
}

/// Writes command output to stdout and everything else (status, warnings, errors) to stderr, so
/// that `--json` output can be piped.
#[derive(Clone, Copy, Debug)]
pub struct Shell {
    color: ColorChoice,
    verbosity: Verbosity,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// A shell with automatic coloring and normal verbosity.
    pub const fn new() -> Self {
        Self { color: ColorChoice::Auto, verbosity: Verbosity::Normal }
    }

    /// A shell with the given settings.
    pub const fn new_with(color: ColorChoice, verbosity: Verbosity) -> Self {
        Self { color, verbosity }
    }

    /// Locks and returns the global shell.
    pub fn get() -> MutexGuard<'static, Self> {
        GLOBAL_SHELL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the global shell with `self`.
    pub fn set(self) {
        anstream::ColorChoice::from(self.color).write_global();
        *Self::get() = self;
    }

    /// The configured color choice.
    pub fn color_choice(&self) -> ColorChoice {
        self.color
    }

    /// The configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether status lines and warnings are suppressed.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Whether notes are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Prints a line to stdout.
    pub fn println(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut out = anstream::stdout().lock();
        writeln!(out, "{args}")
    }

    /// Prints a status line to stderr: a right-aligned green title followed by the message.
    pub fn status(&mut self, title: &str, args: fmt::Arguments<'_>) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        let mut err = anstream::stderr().lock();
        writeln!(err, "{STATUS}{title:>12}{STATUS:#} {args}")
    }

    /// Prints a warning to stderr.
    pub fn warn(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if self.is_quiet() {
            return Ok(());
        }
        let mut err = anstream::stderr().lock();
        writeln!(err, "{WARN}Warning:{WARN:#} {args}")
    }

    /// Prints an error to stderr. Errors are never suppressed.
    pub fn error(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut err = anstream::stderr().lock();
        writeln!(err, "{ERROR}Error:{ERROR:#} {args}")
    }

    /// Prints a note to stderr when verbose.
    pub fn verbose(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        if !self.is_verbose() {
            return Ok(());
        }
        let mut err = anstream::stderr().lock();
        writeln!(err, "{NOTE}note:{NOTE:#} {args}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Shell::new_with(ColorChoice::Never, Verbosity::Quiet).is_quiet());
        assert!(!Shell::new().is_quiet());
    }

    #[test]
    fn notes_need_verbose() {
        assert!(!Shell::new().is_verbose());
        assert!(!Shell::new_with(ColorChoice::Never, Verbosity::Quiet).is_verbose());
        assert!(Shell::new_with(ColorChoice::Never, Verbosity::Verbose).is_verbose());

        // a gated note writes nothing and succeeds
        let mut normal = Shell::new_with(ColorChoice::Never, Verbosity::Normal);
        assert!(normal.verbose(format_args!("hidden")).is_ok());
    }
}
