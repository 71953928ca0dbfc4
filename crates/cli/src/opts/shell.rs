use clap::Parser;
use msig_common::shell::{ColorChoice, Shell, Verbosity};

/// Global shell options.
#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct ShellOptions {
    /// Use verbose output.
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Do not print status messages or warnings.
    #[arg(long, short, global = true, alias = "silent", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log messages coloring.
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,
}

impl ShellOptions {
    pub fn shell(self) -> Shell {
        let verbosity = match (self.verbose, self.quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Normal,
        };
        Shell::new_with(self.color.unwrap_or_default(), verbosity)
    }

    pub fn set_global_shell(self) {
        self.shell().set();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags() {
        let opts = ShellOptions::parse_from(["msig", "-q", "--color", "never"]);
        let shell = opts.shell();
        assert_eq!(shell.verbosity(), Verbosity::Quiet);
        assert_eq!(shell.color_choice(), ColorChoice::Never);

        let opts = ShellOptions::parse_from(["msig", "-v"]);
        assert_eq!(opts.shell().verbosity(), Verbosity::Verbose);

        assert!(ShellOptions::try_parse_from(["msig", "-v", "-q"]).is_err());
    }
}
