//! Values passed to templates.

use std::collections::BTreeMap;

use minijinja::Value;
use moat_config::{HighlightConfig, LinkConfig};
use moat_renderer::TocEntry;
use serde::Serialize;

/// Read-only view of a page, shared by its layout and its shortcodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageContext {
    pub title: String,
    pub description: String,
    /// URL of the page including the base path, e.g. `/docs/guide/`.
    pub current_path: String,
    pub site_name: String,
    pub base_path: String,
    /// Front matter keys other than the known ones.
    pub extra: BTreeMap<String, serde_json::Value>,
    /// The `[extra]` table of `config.toml`.
    pub site: BTreeMap<String, serde_json::Value>,
}

/// Everything a layout sees: the page fields plus rendered markup.
#[derive(Debug, Serialize)]
pub struct LayoutContext<'a> {
    #[serde(flatten)]
    pub page: &'a PageContext,
    /// Rendered page body, marked safe.
    pub content: Value,
    /// Rendered navigation markup, marked safe.
    pub nav: Value,
    pub links: &'a [LinkConfig],
    pub highlight: &'a HighlightConfig,
    pub toc: &'a [TocEntry],
}

impl<'a> LayoutContext<'a> {
    #[must_use]
    pub fn new(
        page: &'a PageContext,
        content: String,
        nav: String,
        links: &'a [LinkConfig],
        highlight: &'a HighlightConfig,
        toc: &'a [TocEntry],
    ) -> Self {
        Self {
            page,
            content: Value::from_safe_string(content),
            nav: Value::from_safe_string(nav),
            links,
            highlight,
            toc,
        }
    }
}

#[cfg(test)]
mod tests {
    use minijinja::Environment;

    use super::*;

    #[test]
    fn test_layout_context_fields() {
        let page = PageContext {
            title: "Intro".to_owned(),
            site_name: "Docs".to_owned(),
            extra: BTreeMap::from([("tags".to_owned(), serde_json::json!(["a", "b"]))]),
            site: BTreeMap::from([("repo".to_owned(), serde_json::json!("moat"))]),
            ..PageContext::default()
        };
        let links = vec![LinkConfig {
            title: "Home".to_owned(),
            url: "https://example.com".to_owned(),
        }];
        let highlight = HighlightConfig::default();
        let ctx = LayoutContext::new(&page, "<p>Hi</p>".to_owned(), "<nav></nav>".to_owned(), &links, &highlight, &[]);

        let mut env = Environment::new();
        env.add_template(
            "t.html",
            "{{ title }}|{{ site_name }}|{{ content }}|{{ nav }}|{{ extra.tags | join(',') }}|{{ site.repo }}|{{ links[0].title }}|{{ highlight.dark }}|{{ toc | length }}",
        )
        .unwrap();
        let out = env.get_template("t.html").unwrap().render(&ctx).unwrap();

        assert_eq!(out, "Intro|Docs|<p>Hi</p>|<nav></nav>|a,b|moat|Home|github-dark|0");
    }
}
