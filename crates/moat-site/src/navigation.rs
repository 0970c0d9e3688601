//! Navigation tree building and sidebar markup.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::document::Document;
use crate::paths::display_title;

/// Navigation entry: a page link or a section holding page links.
///
/// Trees are at most one level deep. Documents nested further down join the
/// section of their top-level directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Display title.
    pub title: String,
    /// URL path of a page; `None` for sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Pages of a section.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Create a page link.
    #[must_use]
    pub fn page(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: Some(path.into()),
            children: Vec::new(),
        }
    }

    /// Create a section with child pages.
    #[must_use]
    pub fn section(title: impl Into<String>, children: Vec<NavNode>) -> Self {
        Self {
            title: title.into(),
            path: None,
            children,
        }
    }

    #[must_use]
    pub fn is_section(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Build the navigation tree for a set of documents.
///
/// The root `index.md` is left out. Root-level pages come first, ordered by
/// relative path, followed by one section per top-level directory, ordered by
/// directory name, with children ordered by relative path.
#[must_use]
pub fn build_navigation(documents: &[Document]) -> Vec<NavNode> {
    let mut root_pages: Vec<&Document> = Vec::new();
    let mut sections: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();

    for doc in documents.iter().filter(|d| !d.is_root_index()) {
        match doc.section() {
            Some(section) => sections.entry(section).or_default().push(doc),
            None => root_pages.push(doc),
        }
    }

    root_pages.sort_by(|a, b| a.rel_path().cmp(b.rel_path()));
    let mut nav: Vec<NavNode> = root_pages.into_iter().map(page_node).collect();

    for (section, mut pages) in sections {
        pages.sort_by(|a, b| a.rel_path().cmp(b.rel_path()));
        let children = pages.into_iter().map(page_node).collect();
        nav.push(NavNode::section(display_title(section), children));
    }

    tracing::debug!(entries = nav.len(), "Built navigation");
    nav
}

fn page_node(doc: &Document) -> NavNode {
    NavNode::page(doc.title(), doc.url())
}

/// Render navigation as sidebar HTML.
///
/// Every href is `base_path` followed by the node path. The link whose href
/// equals `current_path` is marked with `aria-current="page"`.
#[must_use]
pub fn render_navigation(nodes: &[NavNode], current_path: &str, base_path: &str) -> String {
    let mut html = String::from("<nav>\n<ul>\n");

    for node in nodes {
        if node.is_section() {
            let _ = write!(
                html,
                "  <li>\n    <details open>\n      <summary>{}</summary>\n      <ul>\n",
                escape_html(&node.title)
            );
            for child in &node.children {
                html.push_str("        ");
                render_link(&mut html, child, current_path, base_path);
            }
            html.push_str("      </ul>\n    </details>\n  </li>\n");
        } else {
            html.push_str("  ");
            render_link(&mut html, node, current_path, base_path);
        }
    }

    html.push_str("</ul>\n</nav>\n");
    html
}

fn render_link(html: &mut String, node: &NavNode, current_path: &str, base_path: &str) {
    let href = format!("{base_path}{}", node.path.as_deref().unwrap_or_default());
    let aria = if href == current_path {
        r#" aria-current="page""#
    } else {
        ""
    };
    let _ = writeln!(
        html,
        r#"<li><a href="{}"{aria}>{}</a></li>"#,
        escape_html(&href),
        escape_html(&node.title)
    );
}

/// Same entities as the markdown renderer's escaper.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::frontmatter::{Metadata, MetadataPolicy};

    fn docs(paths: &[&str]) -> Vec<Document> {
        paths
            .iter()
            .map(|p| Document::new(*p, Metadata::default(), ""))
            .collect()
    }

    #[test]
    fn test_root_index_excluded_and_sections_grouped() {
        let nav = build_navigation(&docs(&[
            "index.md",
            "about.md",
            "01-guide/02-config.md",
            "01-guide/01-intro.md",
        ]));

        assert_eq!(
            nav,
            vec![
                NavNode::page("About", "/about/"),
                NavNode::section(
                    "Guide",
                    vec![
                        NavNode::page("Intro", "/guide/intro/"),
                        NavNode::page("Config", "/guide/config/"),
                    ]
                ),
            ]
        );
    }

    #[test]
    fn test_ordering() {
        let nav = build_navigation(&docs(&[
            "02-reference/b.md",
            "zeta.md",
            "01-guide/b.md",
            "alpha.md",
            "02-reference/a.md",
        ]));

        let titles: Vec<&str> = nav.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Zeta", "Guide", "Reference"]);
        assert_eq!(nav[3].children[0].title, "A");
        assert_eq!(nav[3].children[1].title, "B");
    }

    #[test]
    fn test_deep_documents_join_top_level_section() {
        let nav = build_navigation(&docs(&[
            "guide/intro.md",
            "guide/advanced/deep/tuning.md",
            "guide/advanced/caching.md",
        ]));

        assert_eq!(nav.len(), 1);
        let children: Vec<&str> = nav[0]
            .children
            .iter()
            .filter_map(|c| c.path.as_deref())
            .collect();
        assert_eq!(
            children,
            vec!["/guide/advanced/caching/", "/guide/advanced/deep/tuning/", "/guide/intro/"]
        );
        assert!(nav[0].children.iter().all(|c| !c.is_section()));
    }

    #[test]
    fn test_nested_index_is_listed() {
        let nav = build_navigation(&docs(&["index.md", "guide/index.md"]));
        assert_eq!(nav[0].children, vec![NavNode::page("Index", "/guide/")]);
    }

    #[test]
    fn test_metadata_title_and_url_used() {
        let doc = Document::parse(
            "01-guide/01-intro.md",
            "---\ntitle: Welcome\nurl: /start\n---\n",
            MetadataPolicy::Lenient,
        )
        .unwrap();
        let nav = build_navigation(&[doc]);
        assert_eq!(nav[0].children, vec![NavNode::page("Welcome", "/start/")]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(build_navigation(&[]).is_empty());
        assert!(build_navigation(&docs(&["index.md"])).is_empty());
    }

    #[test]
    fn test_render_navigation_markup() {
        let nav = vec![
            NavNode::page("About", "/about/"),
            NavNode::section("Guide", vec![NavNode::page("Intro", "/guide/intro/")]),
        ];

        let html = render_navigation(&nav, "/docs/guide/intro/", "/docs");

        assert_eq!(
            html,
            "<nav>\n<ul>\n\
             \x20 <li><a href=\"/docs/about/\">About</a></li>\n\
             \x20 <li>\n\
             \x20   <details open>\n\
             \x20     <summary>Guide</summary>\n\
             \x20     <ul>\n\
             \x20       <li><a href=\"/docs/guide/intro/\" aria-current=\"page\">Intro</a></li>\n\
             \x20     </ul>\n\
             \x20   </details>\n\
             \x20 </li>\n\
             </ul>\n</nav>\n"
        );
    }

    #[test]
    fn test_render_navigation_escapes_titles() {
        let nav = vec![NavNode::page("Q&A <FAQ>", "/qa/")];
        let html = render_navigation(&nav, "/", "");
        assert!(html.contains(r#"<a href="/qa/">Q&amp;A &lt;FAQ&gt;</a>"#));
        assert!(!html.contains("aria-current"));
    }

    #[test]
    fn test_render_navigation_escapes_quotes() {
        let nav = vec![NavNode::page(r#"What's "new""#, "/it's/")];
        let html = render_navigation(&nav, "/", "");
        assert!(html.contains(r#"<a href="/it&#x27;s/">What&#x27;s &quot;new&quot;</a>"#));
    }
}
