//! Terminal state saved at startup and put back on interrupt
//!
//! `Password` turns echo off while it reads. Exiting from the Ctrl-C handler
//! skips its cleanup, so the attributes captured before any prompt are
//! restored instead.

use dialoguer::console::Term;
use nix::sys::termios::{self, SetArg, Termios};

/// Attributes of stdin, if stdin is a terminal
pub struct TerminalState {
    saved: Option<Termios>,
}

impl TerminalState {
    /// Save the current stdin attributes
    #[must_use]
    pub fn capture() -> Self {
        let saved = match termios::tcgetattr(std::io::stdin()) {
            Ok(attrs) => Some(attrs),
            Err(e) => {
                tracing::debug!("stdin is not a terminal, nothing to restore: {e}");
                None
            }
        };
        Self { saved }
    }

    /// Whether there is anything to restore
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.saved.is_some()
    }

    /// Put echo and line mode back the way they were and show the cursor
    pub fn restore(&self) {
        let Some(attrs) = &self.saved else {
            return;
        };

        if let Err(e) = termios::tcsetattr(std::io::stdin(), SetArg::TCSANOW, attrs) {
            tracing::warn!("Failed to restore terminal attributes: {e}");
        }
        if let Err(e) = Term::stderr().show_cursor() {
            tracing::debug!("Failed to show cursor: {e}");
        }
    }
}
