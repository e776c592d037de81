//! View rendering module
//!
//! File-backed view engine for the two HTML collaborators: the static index
//! page and the user list template. The engine is handed to handlers through
//! `AppState`, so store logic stays testable without touching the filesystem
//! and tests can point the engine at their own files.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::ViewsConfig;
use crate::store::User;

/// Marker in the user list template that gets replaced with one `<tr>` per user
const ROWS_PLACEHOLDER: &str = "{{rows}}";

/// Why rendering the user list failed. The `Display` text is surfaced
/// verbatim in the 500 response body.
#[derive(Debug)]
pub enum RenderError {
    /// Template file could not be read
    Io(std::io::Error),
    /// Template file has no `{{rows}}` marker to substitute
    MissingPlaceholder(PathBuf),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to load template: {e}"),
            Self::MissingPlaceholder(path) => write!(
                f,
                "template {} is missing the {ROWS_PLACEHOLDER} placeholder",
                path.display()
            ),
        }
    }
}

/// Paths to the view resources, resolved once from configuration
#[derive(Debug)]
pub struct ViewEngine {
    index_path: PathBuf,
    user_list_path: PathBuf,
}

impl ViewEngine {
    pub fn from_config(views: &ViewsConfig) -> Self {
        let dir = Path::new(&views.dir);
        Self {
            index_path: dir.join(&views.index_file),
            user_list_path: dir.join(&views.user_list_template),
        }
    }

    /// Load the static index page. `None` on any read failure, which the
    /// caller turns into the generic 404.
    pub async fn load_index(&self) -> Option<String> {
        fs::read_to_string(&self.index_path).await.ok()
    }

    /// Render the user list template against the given users
    pub async fn render_user_list(&self, users: &[User]) -> Result<String, RenderError> {
        let template = fs::read_to_string(&self.user_list_path)
            .await
            .map_err(RenderError::Io)?;

        if !template.contains(ROWS_PLACEHOLDER) {
            return Err(RenderError::MissingPlaceholder(self.user_list_path.clone()));
        }

        Ok(template.replace(ROWS_PLACEHOLDER, &format_rows(users)))
    }
}

fn format_rows(users: &[User]) -> String {
    users
        .iter()
        .map(|user| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                user.id,
                escape_html(&user.name),
                escape_html(&user.email)
            )
        })
        .collect()
}

/// Escape text for embedding in HTML element content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_views_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("users-server-render-{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn engine(dir: &Path) -> ViewEngine {
        ViewEngine::from_config(&ViewsConfig {
            dir: dir.display().to_string(),
            index_file: "index.html".to_string(),
            user_list_template: "UserList.html".to_string(),
        })
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"a&b"</b>"#),
            "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[tokio::test]
    async fn renders_one_row_per_user() {
        let dir = temp_views_dir("rows");
        std::fs::write(
            dir.join("UserList.html"),
            "<table>{{rows}}</table>",
        )
        .unwrap();

        let users = vec![
            User {
                id: 0,
                name: "John <Doe>".to_string(),
                email: "john@example.com".to_string(),
            },
            User {
                id: 0,
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
            },
        ];

        let html = engine(&dir).render_user_list(&users).await.unwrap();
        assert!(html.contains("<td>John &lt;Doe&gt;</td>"));
        assert!(html.contains("<td>jane@example.com</td>"));
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[tokio::test]
    async fn missing_template_is_an_io_error() {
        let dir = temp_views_dir("missing-file");
        let err = engine(&dir).render_user_list(&[]).await.unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }

    #[tokio::test]
    async fn template_without_placeholder_is_rejected() {
        let dir = temp_views_dir("no-placeholder");
        std::fs::write(dir.join("UserList.html"), "<table></table>").unwrap();

        let err = engine(&dir).render_user_list(&[]).await.unwrap_err();
        assert!(matches!(err, RenderError::MissingPlaceholder(_)));
        assert!(err.to_string().contains("{{rows}}"));
    }

    #[tokio::test]
    async fn index_load_failure_yields_none() {
        let dir = temp_views_dir("no-index");
        assert!(engine(&dir).load_index().await.is_none());
    }
}
