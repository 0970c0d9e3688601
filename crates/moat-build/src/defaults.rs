//! Files compiled into the binary: built-in layouts and the `init` scaffold.

/// File name of the base layout.
pub const BASE_LAYOUT: &str = "_layout.html";

pub(crate) const BASE_LAYOUT_SOURCE: &str = include_str!("../defaults/_layout.html");

/// Built-in layout variants as `(variant, source)`.
pub(crate) const BUILTIN_VARIANTS: &[(&str, &str)] = &[(
    "landing",
    include_str!("../defaults/_layout.landing.html"),
)];

/// Layouts, configuration and the sample shortcode written by `init`.
pub(crate) const SCAFFOLD_FILES: &[(&str, &str)] = &[
    (BASE_LAYOUT, BASE_LAYOUT_SOURCE),
    (
        "_layout.landing.html",
        include_str!("../defaults/_layout.landing.html"),
    ),
    ("config.toml", include_str!("../defaults/config.toml")),
    (
        "_shortcodes/note.html",
        include_str!("../defaults/_shortcodes/note.html"),
    ),
];

/// Starter pages written by `init` after the scaffold files.
pub(crate) const STARTER_PAGES: &[(&str, &str)] = &[
    ("index.md", include_str!("../defaults/index.md")),
    (
        "01-guide/01-getting-started.md",
        include_str!("../defaults/01-guide/01-getting-started.md"),
    ),
];

/// File name of a layout variant, e.g. `_layout.landing.html`.
#[must_use]
pub fn variant_file_name(variant: &str) -> String {
    format!("_layout.{variant}.html")
}

/// Variant name of a layout file name; `None` for the base layout and other files.
#[must_use]
pub fn variant_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix("_layout.")?
        .strip_suffix(".html")
        .filter(|variant| !variant.is_empty())
}
