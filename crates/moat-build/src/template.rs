//! Template environment shared by layouts and shortcodes.

use std::io;
use std::path::PathBuf;

use minijinja::{Environment, Value};

use crate::blocks::BlockScanError;

/// Error loading or executing a layout or shortcode template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Syntax {
        file: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("invalid blocks in {file}: {source}")]
    Blocks {
        file: String,
        #[source]
        source: BlockScanError,
    },

    #[error("no _layout.html found in {} and built-in layouts are disabled", .0.display())]
    MissingBase(PathBuf),

    #[error("layout variant \"{0}\" not found")]
    UnknownVariant(String),

    #[error("failed to render {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Mark text as trusted HTML so auto-escaping leaves it alone.
///
/// Pass-through only; nothing is sanitized.
fn safe_html(value: String) -> Value {
    Value::from_safe_string(value)
}

/// Create an environment with the helpers every template can use.
///
/// Templates named `*.html` are auto-escaped.
pub(crate) fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_function("safe_html", safe_html);
    env.add_function("safeHTML", safe_html);
    env
}

#[cfg(test)]
mod tests {
    use minijinja::context;

    use super::*;

    #[test]
    fn test_html_templates_are_escaped() {
        let mut env = new_environment();
        env.add_template_owned("page.html", "{{ text }}").unwrap();
        let out = env
            .get_template("page.html")
            .unwrap()
            .render(context! { text => "<b>" })
            .unwrap();
        assert_eq!(out, "&lt;b&gt;");
    }

    #[test]
    fn test_safe_html_function() {
        let mut env = new_environment();
        env.add_template_owned("page.html", "{{ safe_html(text) }}|{{ safeHTML(text) }}")
            .unwrap();
        let out = env
            .get_template("page.html")
            .unwrap()
            .render(context! { text => "<b>x</b>" })
            .unwrap();
        assert_eq!(out, "<b>x</b>|<b>x</b>");
    }
}
