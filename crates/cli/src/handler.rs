//! Error reports of the `msig` binary.

use eyre::EyreHandler;
use itertools::Itertools;
use msig_wallets::WalletError;
use std::{error::Error, fmt};

/// Suggests what to do about an error, `None` when it has nothing to suggest.
pub type HintFn = fn(&(dyn Error + 'static)) -> Option<&'static str>;

/// Reports an error chain.
///
/// `{}` renders the deduplicated chain on one line. `{:?}` renders the outermost error, its causes
/// under `Context:` and, when one of the errors in the chain has one, a `Hint:` line.
pub struct Handler {
    hint: Option<HintFn>,
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler {
    pub fn new() -> Self {
        Self { hint: None, debug_handler: None }
    }

    /// Adds hints for errors of other crates, tried after the built-in ones.
    pub fn hint(mut self, hint: Option<HintFn>) -> Self {
        self.hint = hint;
        self
    }

    /// Override the debug handler with a custom one.
    pub fn debug_handler(mut self, debug_handler: Option<Box<dyn EyreHandler>>) -> Self {
        self.debug_handler = debug_handler;
        self
    }

    /// The first hint found walking the chain from the outermost error.
    fn hint_for(&self, error: &(dyn Error + 'static)) -> Option<&'static str> {
        std::iter::successors(Some(error), |&err| err.source())
            .find_map(|err| wallet_hint(err).or_else(|| self.hint.and_then(|hint| hint(err))))
    }
}

fn wallet_hint(error: &(dyn Error + 'static)) -> Option<&'static str> {
    match error.downcast_ref::<WalletError>()? {
        WalletError::NotConnected => {
            Some("read-only commands work without a signer; `--from <ADDRESS>` picks the account")
        }
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        msig_common::errors::dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let errors = msig_common::errors::dedup_chain(error);
        let Some((outermost, causes)) = errors.split_first() else {
            return fmt::Debug::fmt(error, f);
        };
        write!(f, "{outermost}")?;

        match causes {
            [] => {}
            [cause] => write!(f, "\n\nContext:\n- {cause}")?,
            causes => {
                write!(f, "\n\nContext:")?;
                for (n, cause) in causes.iter().enumerate() {
                    write!(f, "\n- Error #{n}: {cause}")?;
                }
            }
        }

        if let Some(hint) = self.hint_for(error) {
            write!(f, "\n\nHint: {hint}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Installs the msig [`eyre`] and [`panic`](mod@std::panic) hooks as the global ones.
///
/// Errors are reported by [`Handler`] with `hint` for the errors it does not know, unless
/// `MSIG_DEBUG` is set, in which case the `color-eyre` report with span traces is printed.
///
/// Panics are always caught by the `color-eyre` panic hook.
pub fn install(hint: HintFn) {
    let panic_section = "This is a bug. Consider reporting it at https://github.com/msig-rs/msig";
    let (panic_hook, debug_hook) =
        color_eyre::config::HookBuilder::default().panic_section(panic_section).into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("MSIG_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler::new().hint(Some(hint)).debug_handler(debug.then(|| debug_hook(e))))
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
