//! The interactive prompt/dispatch loop.

use std::io::{self, BufRead, Write};

use tracing::{debug, error, info, warn};

use super::actions;
use super::choice::{MenuChoice, MENU_TEXT};
use crate::directory::Directory;
use crate::error::{AppError, DirectoryError};

/// Where the loop is between iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Prompting,
    Dispatching(MenuChoice),
    Terminated,
}

/// Prompts for a menu choice, runs the matching action against the directory
/// and repeats until the user exits.
///
/// A failed remote call ends the loop with that error unless
/// [`CommandLoop::exit_on_error`] is turned off.
pub struct CommandLoop<'a, D: Directory + ?Sized> {
    directory: &'a D,
    exit_on_error: bool,
}

impl<'a, D: Directory + ?Sized> CommandLoop<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            exit_on_error: true,
        }
    }

    /// With `false`, a failed remote call prints a diagnostic and the loop
    /// prompts again instead of returning the error.
    pub fn exit_on_error(mut self, enabled: bool) -> Self {
        self.exit_on_error = enabled;
        self
    }

    /// Run until choice 0 or end of input.
    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> Result<(), AppError> {
        let mut state = LoopState::Prompting;

        loop {
            state = match state {
                LoopState::Prompting => match prompt(&mut input, output)? {
                    Some(choice) => LoopState::Dispatching(choice),
                    None => {
                        info!("Input closed, leaving menu");
                        LoopState::Terminated
                    }
                },
                LoopState::Dispatching(choice) => self.dispatch(choice, output).await?,
                LoopState::Terminated => return Ok(()),
            };
        }
    }

    async fn dispatch<W: Write>(&self, choice: MenuChoice, out: &mut W) -> Result<LoopState, AppError> {
        debug!("Dispatching {:?}", choice);

        match choice {
            MenuChoice::Exit => {
                writeln!(out, "Goodbye...")?;
                return Ok(LoopState::Terminated);
            }
            MenuChoice::ShowToken => {
                let result = self.directory.fetch_access_token().await;
                self.complete(result, "Error getting app token", out, |token, out| {
                    actions::render_token(token, out)
                })?;
            }
            MenuChoice::ListUsers => {
                let result = self.directory.fetch_users_page().await;
                self.complete(result, "Error getting users", out, actions::render_users)?;
            }
            MenuChoice::Placeholder => actions::make_graph_call(self.directory),
            MenuChoice::ListApplications => {
                let result = self.directory.fetch_applications_page().await;
                self.complete(
                    result,
                    "Error getting applications",
                    out,
                    actions::render_applications,
                )?;
            }
            MenuChoice::Invalid(value) => {
                debug!("Rejected menu input {}", value);
                writeln!(out, "Invalid choice! Please try again.")?;
            }
        }

        out.flush()?;
        Ok(LoopState::Prompting)
    }

    /// Render a successful result, or apply the failure policy.
    fn complete<T, W: Write>(
        &self,
        result: Result<T, DirectoryError>,
        what: &str,
        out: &mut W,
        render: impl FnOnce(&T, &mut W) -> io::Result<()>,
    ) -> Result<(), AppError> {
        match result {
            Ok(value) => render(&value, out)?,
            Err(e) if self.exit_on_error => {
                error!("{}: {}", what, e);
                return Err(e.into());
            }
            Err(e) => {
                warn!("{}: {}", what, e);
                writeln!(out, "{}: {}", what, e)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Print the menu and read one choice. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<MenuChoice>> {
    writeln!(out, "{}", MENU_TEXT)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(MenuChoice::parse(&line)))
}
