//! Interactive terminal menu.
//!
//! The loop prints a numbered menu, reads a choice and runs one action per
//! iteration against a [`crate::directory::Directory`].

pub mod actions;
pub mod choice;
pub mod command_loop;

pub use command_loop::CommandLoop;
