//! View loading and rendering.
//!
//! # Responsibilities
//! - Resolve view names to files under the configured view directory
//! - HTML-escape every value handed to a view
//! - Substitute `{{ name }}` placeholders
//!
//! Anything beyond placeholder substitution belongs to a real template
//! engine.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::config::ViewConfig;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Errors from view resolution and rendering.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view '{name}' not found at {}", path.display())]
    NotFound { name: String, path: PathBuf },

    /// View names may not leave the view directory.
    #[error("invalid view name '{0}'")]
    InvalidName(String),

    #[error("failed to read view {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values made available to a view.
pub type ViewVars = BTreeMap<String, String>;

/// The view directory.
#[derive(Debug, Clone)]
pub struct Views {
    root: PathBuf,
    extension: String,
}

impl Views {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(&config.dir, &config.extension)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a view by name, e.g. `"home"` or `"notes/list"`.
    pub fn view(&self, name: &str) -> Result<View, ViewError> {
        let relative = Path::new(name);
        let escapes = name.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(ViewError::InvalidName(name.to_string()));
        }

        let path = self.root.join(format!("{}.{}", name, self.extension));
        if !path.is_file() {
            return Err(ViewError::NotFound {
                name: name.to_string(),
                path,
            });
        }

        Ok(View {
            name: name.to_string(),
            path,
        })
    }

    /// Resolve and render in one step.
    pub async fn render(&self, name: &str, vars: &ViewVars) -> Result<String, ViewError> {
        self.view(name)?.render(vars).await
    }
}

/// A resolved view file.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    path: PathBuf,
}

impl View {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render with escaped values. Unknown placeholders render empty.
    pub async fn render(&self, vars: &ViewVars) -> Result<String, ViewError> {
        let template = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ViewError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(substitute(&template, vars))
    }
}

fn substitute(template: &str, vars: &ViewVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.get(&caps[1])
                .map(|value| html_escape::encode_quoted_attribute(value).into_owned())
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> ViewVars {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_substitute_escapes() {
        let out = substitute(
            "<h1>{{ title }}</h1><p title=\"{{title}}\">{{ missing }}</p>",
            &vars(&[("title", "<b>\"Tom\" & 'Jerry'</b>")]),
        );
        assert!(out.starts_with("<h1>&lt;b&gt;&quot;Tom&quot; &amp; "));
        assert!(out.ends_with("\"></p>"));
        assert!(!out.contains("<b>"));
        assert!(!out.contains("'Jerry'"));
        assert_eq!(out.matches("&lt;/b&gt;").count(), 2);
    }

    #[tokio::test]
    async fn test_render_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("notes")).unwrap();
        std::fs::write(dir.path().join("notes/show.html"), "Note {{ id }}").unwrap();

        let views = Views::new(dir.path(), "html");
        let html = views.render("notes/show", &vars(&[("id", "7")])).await.unwrap();
        assert_eq!(html, "Note 7");

        assert!(matches!(views.view("notes/missing"), Err(ViewError::NotFound { .. })));
        assert!(matches!(views.view("../etc/passwd"), Err(ViewError::InvalidName(_))));
        assert!(matches!(views.view("/etc/passwd"), Err(ViewError::InvalidName(_))));
    }
}
