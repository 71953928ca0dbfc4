/// Prints a line of command output to stdout through the global [`Shell`](crate::shell::Shell).
///
/// Evaluates to an [`std::io::Result<()>`].
#[macro_export]
macro_rules! sh_println {
    () => {
        $crate::sh_println!("")
    };
    ($($t:tt)*) => {
        $crate::shell::Shell::get().println(::core::format_args!($($t)*))
    };
}

/// Prints a right-aligned, highlighted status line to stderr, cargo style.
///
/// ```ignore
/// sh_status!("Submitted", "{tx_hash:#x}")?;
/// ```
#[macro_export]
macro_rules! sh_status {
    ($title:expr, $($t:tt)*) => {
        $crate::shell::Shell::get().status($title, ::core::format_args!($($t)*))
    };
}

/// Prints a warning to stderr, unless the shell is quiet.
#[macro_export]
macro_rules! sh_warn {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().warn(::core::format_args!($($t)*))
    };
}

/// Prints an error to stderr.
#[macro_export]
macro_rules! sh_err {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().error(::core::format_args!($($t)*))
    };
}

/// Prints a note to stderr, only in verbose mode.
#[macro_export]
macro_rules! sh_verbose {
    ($($t:tt)*) => {
        $crate::shell::Shell::get().verbose(::core::format_args!($($t)*))
    };
}
