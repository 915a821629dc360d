//! Output rendering for the menu actions.

use std::io::{self, Write};

use crate::directory::Directory;
use crate::graph::{ApplicationRecord, PageResult, UserRecord};

/// Printed in place of a missing email address.
pub const NO_EMAIL: &str = "NO EMAIL";

/// Action.ShowToken output. The token is printed unmasked.
pub fn render_token<W: Write>(token: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "App-only token: {}", token)
}

/// Action.ListUsers output for a single page.
pub fn render_users<W: Write>(page: &PageResult<UserRecord>, out: &mut W) -> io::Result<()> {
    for user in &page.items {
        writeln!(out, "User: {}", user.display_name)?;
        writeln!(out, "  ID: {}", user.id)?;
        writeln!(out, "  Email: {}", user.mail.as_deref().unwrap_or(NO_EMAIL))?;
    }

    writeln!(out)?;
    writeln!(out, "More users available? {}", page.has_more())?;
    writeln!(out)
}

/// Action.ListApplications output for a single page.
pub fn render_applications<W: Write>(
    page: &PageResult<ApplicationRecord>,
    out: &mut W,
) -> io::Result<()> {
    for application in &page.items {
        writeln!(out, "Application: {}", application.display_name)?;
        writeln!(out, "  ID: {}", application.id)?;
        writeln!(out, "  Created time: {}", application.created_date_time)?;
    }

    writeln!(out)
}

/// Action.Placeholder, menu entry 3. Makes no call and prints nothing.
///
/// Custom Graph calls go here; the session is passed in so they can use it.
pub fn make_graph_call<D: Directory + ?Sized>(_directory: &D) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, id: &str, mail: Option<&str>) -> UserRecord {
        UserRecord {
            display_name: name.into(),
            id: id.into(),
            mail: mail.map(Into::into),
        }
    }

    fn render(page: &PageResult<UserRecord>) -> String {
        let mut out = Vec::new();
        render_users(page, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_token() {
        let mut out = Vec::new();
        render_token("eyJ0eXAi.abc", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "App-only token: eyJ0eXAi.abc\n");
    }

    #[test]
    fn test_render_users_email_fallback() {
        let page = PageResult::new(
            vec![user("Alice", "1", None), user("Bob", "2", Some("a@b.com"))],
            None,
        );

        assert_eq!(
            render(&page),
            "User: Alice\n  ID: 1\n  Email: NO EMAIL\n\
             User: Bob\n  ID: 2\n  Email: a@b.com\n\
             \nMore users available? false\n\n"
        );
    }

    #[test]
    fn test_render_users_with_continuation() {
        let page = PageResult::new(
            vec![user("Alice", "1", None)],
            Some("https://graph.microsoft.com/v1.0/users?$skiptoken=abc".into()),
        );
        assert!(render(&page).contains("More users available? true\n"));
    }

    #[test]
    fn test_render_empty_user_page() {
        let page = PageResult::new(Vec::new(), None);
        assert_eq!(render(&page), "\nMore users available? false\n\n");
    }

    #[test]
    fn test_render_applications() {
        let page = PageResult::new(
            vec![ApplicationRecord {
                display_name: "Graph Tutorial".into(),
                id: "a1".into(),
                created_date_time: "2024-02-01T09:30:00Z".into(),
            }],
            Some("next".into()),
        );

        let mut out = Vec::new();
        render_applications(&page, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Application: Graph Tutorial\n  ID: a1\n  Created time: 2024-02-01T09:30:00Z\n\n"
        );
    }
}
