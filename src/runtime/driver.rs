use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::error::ForgeError;
use crate::geometry::Size;

use super::WorkbenchRuntime;

/// Smallest terminal that fits the tab strip, the controls, a few result
/// lines and the two-line status bar.
pub const MIN_TERMINAL: Size = Size::new(40, 12);

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("workbench error: {0}")]
    Runtime(#[from] ForgeError),
    #[error("could not {action} the terminal: {source}")]
    Terminal {
        action: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("terminal is {actual}, the workbench needs at least {required}")]
    TooSmall { actual: Size, required: Size },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Runs the workbench full-screen.
///
/// Bracketed paste is switched on so a pasted prompt arrives as one
/// `RuntimeEvent::Paste` instead of a burst of keys. Raw mode and the
/// alternate screen are undone even when the runtime fails.
pub struct CliDriver {
    runtime: WorkbenchRuntime,
}

impl CliDriver {
    pub fn new(runtime: WorkbenchRuntime) -> Self {
        Self { runtime }
    }

    pub fn run(mut self) -> DriverResult<()> {
        let size = terminal::size().map_err(|source| CliDriverError::Terminal {
            action: "measure",
            source,
        })?;
        let size = check_size(Size::new(size.0, size.1))?;

        let mut stdout = io::stdout();
        enter(&mut stdout)?;
        let result = self.drive(&mut stdout, size);
        leave(&mut stdout);
        result
    }

    fn drive(&mut self, stdout: &mut impl Write, size: Size) -> DriverResult<()> {
        self.runtime.resize(size)?;
        self.runtime.run(stdout)?;
        Ok(())
    }
}

fn check_size(actual: Size) -> DriverResult<Size> {
    if actual.covers(MIN_TERMINAL) {
        Ok(actual)
    } else {
        Err(CliDriverError::TooSmall {
            actual,
            required: MIN_TERMINAL,
        })
    }
}

fn enter(stdout: &mut impl Write) -> DriverResult<()> {
    terminal::enable_raw_mode().map_err(|source| CliDriverError::Terminal {
        action: "enable raw mode on",
        source,
    })?;
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableFocusChange,
        Hide,
        Clear(ClearType::All)
    )?;
    Ok(())
}

fn leave(stdout: &mut impl Write) {
    execute!(
        stdout,
        DisableFocusChange,
        DisableBracketedPaste,
        Show,
        LeaveAlternateScreen
    )
    .ok();
    terminal::disable_raw_mode().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undersized_terminal_is_refused() {
        let err = check_size(Size::new(30, 20)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "terminal is 30x20, the workbench needs at least 40x12"
        );
        assert!(check_size(Size::new(40, 11)).is_err());
        assert_eq!(check_size(Size::new(100, 30)).unwrap(), Size::new(100, 30));
    }

    #[test]
    fn runtime_errors_keep_their_message() {
        let err = CliDriverError::from(ForgeError::Configuration("bad seed".into()));
        assert!(err.to_string().ends_with("bad seed"));
    }
}
