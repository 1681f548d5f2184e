//! Text and identifier normalization
//!
//! Sidebar rows and target documents meet on a *document key*: a slash-separated path relative
//! to the documentation root with the file extension removed (`attributes/1022`, `ses/index`).
//! Both sides of the join go through this module so the keys agree.

use std::path::{Component, Path};

/// Collapse whitespace runs to a single space and trim. Non-breaking spaces count as spaces.
pub fn normalize_text(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a sidebar href is turned into a document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext<'a> {
    /// Key directory relative hrefs are joined to (`attributes`, `relationships`, empty for the root).
    pub context: &'a str,
    /// Absolute prefix of the source site (`/ISBDM/docs/`).
    pub site_prefix: &'a str,
    /// Hrefs whose stem contains this marker are remapped into `context`.
    pub remap_stem: Option<&'a str>,
}

impl<'a> KeyContext<'a> {
    pub fn new(context: &'a str, site_prefix: &'a str) -> Self {
        Self {
            context,
            site_prefix,
            remap_stem: None,
        }
    }

    pub fn with_remap_stem(mut self, remap_stem: Option<&'a str>) -> Self {
        self.remap_stem = remap_stem;
        self
    }
}

/// Derive the document key a sidebar href points at.
///
/// Returns `None` for empty hrefs and for hrefs that normalize to nothing.
pub fn normalize_href_to_key(href: &str, ctx: &KeyContext<'_>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Some(marker) = ctx.remap_stem {
        let stem = file_stem(href);
        let upper_stem = stem.to_uppercase();
        let upper_marker = marker.to_uppercase();
        if upper_stem == upper_marker {
            return Some(join_key(ctx.context, "index"));
        }
        if !upper_marker.is_empty() && upper_stem.contains(&upper_marker) {
            return Some(join_key(ctx.context, stem));
        }
    }

    let path_part = if !ctx.site_prefix.is_empty() && href.starts_with(ctx.site_prefix) {
        href[ctx.site_prefix.len()..].trim_start_matches('/').to_string()
    } else if href.starts_with('/') {
        tracing::warn!(
            "Found absolute href '{}' outside the site prefix in context '{}'",
            href,
            ctx.context
        );
        href.trim_start_matches('/').to_string()
    } else {
        join_key(ctx.context, href)
    };

    let normalized = normalize_segments(strip_extension(&path_part));
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Document key of a target file: its path relative to `root`, extension removed.
pub fn document_key(path: &Path, root: &Path) -> Option<String> {
    let relative = pathdiff::diff_paths(path, root)?;
    let relative = relative.with_extension("");
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Rewrite a source-site link into a docs-relative target link.
///
/// The first occurrence of `site_prefix` becomes `docs_prefix`, `.html` is removed and the
/// leading slash is dropped when the result lives under `docs_prefix`.
pub fn rewrite_link_href(href: &str, site_prefix: &str, docs_prefix: &str) -> String {
    let rewritten = if site_prefix.is_empty() {
        href.to_string()
    } else {
        href.replacen(site_prefix, docs_prefix, 1)
    };
    let rewritten = rewritten.replace(".html", "");
    if !docs_prefix.is_empty() && rewritten.starts_with(docs_prefix) {
        rewritten
            .strip_prefix('/')
            .map(str::to_string)
            .unwrap_or(rewritten)
    } else {
        rewritten
    }
}

/// Replace escaped typographic entities that survived decoding.
pub fn typographic(text: &str) -> String {
    text.replace("&ldquo;", "\u{201c}")
        .replace("&rdquo;", "\u{201d}")
        .replace("&hellip;", "\u{2026}")
}

fn join_key(context: &str, rest: &str) -> String {
    let context = context.trim_matches('/');
    if context.is_empty() {
        rest.to_string()
    } else {
        format!("{context}/{rest}")
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}

fn strip_extension(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => path,
        Some(dot) => &path[..path.len() - name.len() + dot],
    }
}

fn normalize_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
