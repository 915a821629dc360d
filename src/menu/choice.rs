//! Menu text and choice parsing.

/// The menu printed before every prompt.
pub const MENU_TEXT: &str = "\
Please choose one of the following options:
0. Exit
1. Display access token
2. List users
3. Make a Graph call
4. List applications";

/// Value substituted for input that is not an integer.
pub const UNPARSEABLE_INPUT: i64 = -1;

/// A selector over the fixed set of menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    ShowToken,
    ListUsers,
    Placeholder,
    ListApplications,
    Invalid(i64),
}

impl MenuChoice {
    /// Parse one line of user input. Never fails: anything that is not an
    /// integer maps to [`UNPARSEABLE_INPUT`] and is therefore invalid.
    pub fn parse(line: &str) -> Self {
        line.trim()
            .parse::<i64>()
            .unwrap_or(UNPARSEABLE_INPUT)
            .into()
    }
}

impl From<i64> for MenuChoice {
    fn from(value: i64) -> Self {
        match value {
            0 => Self::Exit,
            1 => Self::ShowToken,
            2 => Self::ListUsers,
            3 => Self::Placeholder,
            4 => Self::ListApplications,
            other => Self::Invalid(other),
        }
    }
}
