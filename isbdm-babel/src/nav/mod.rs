//! Sidebar navigation hierarchy
//!
//! Source pages render their section sidebar as a flat list of rows inside
//! `nav.navISBDMSection`. The only hierarchy signal is the number of indent icons
//! (`i.bi-arrow-return-right`) in a row, plus document order:
//!
//! ```text
//! <nav class="navISBDMSection">
//!   <div class="d-flex"><a href="1022.html">Attributes</a></div>
//!   <div class="d-flex"><i class="bi-arrow-return-right"></i><a href="1023.html">has extent</a></div>
//! </nav>
//! ```
//!
//! Rows are read into [`RawNavEntry`] values, combined per logical section
//! ([`section::build_section`]) and rebuilt into a strict tree ([`hierarchy::reconstruct`]).
//! Every [`NavEntry`] carries the flags its box-drawing prefix is rendered from.

pub mod cache;
pub mod hierarchy;
pub mod metadata;
pub mod prefix;
pub mod section;

use crate::dom::{self, Query};
use crate::error::BabelError;
use crate::text::{self, KeyContext};
use markup5ever_rcdom::Handle;
use serde::Serialize;

pub use cache::{SectionCache, SidebarMatch};
pub use hierarchy::reconstruct;
pub use metadata::{apply_sidebar_metadata, SidebarMetadata};
pub use prefix::render_prefix;
pub use section::{build_section, DirectoryLoader, MemoryLoader, SectionSpec, SourceLoader};

/// A sidebar row as read from a source page, before hierarchy reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNavEntry {
    /// `<source>#<row position>`
    pub source_reference: String,
    pub normalized_key: String,
    pub label: String,
    /// Number of indent icons in the row.
    pub local_indent: usize,
    /// 1-based position within the section.
    pub position: usize,
    pub original_href: String,
}

/// A sidebar entry placed in the reconstructed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub source_reference: String,
    pub normalized_key: String,
    pub label: String,
    pub original_href: String,
    pub absolute_depth: usize,
    pub position: usize,
    pub is_last_sibling: bool,
    /// One flag per ancestor level, outermost first. Always `absolute_depth - 1` long.
    pub ancestor_is_last: Vec<bool>,
    pub has_children: bool,
}

impl NavEntry {
    pub fn prefix(&self) -> Option<String> {
        render_prefix(self.absolute_depth, self.is_last_sibling, &self.ancestor_is_last)
    }
}

/// One `div.d-flex` row of a sidebar container.
#[derive(Debug, Clone)]
pub(crate) struct SidebarRow {
    pub href: Option<String>,
    pub label: String,
    pub indent: usize,
}

/// Every sidebar container in the page, in document order.
pub(crate) fn sidebar_containers(root: &Handle) -> Vec<Handle> {
    dom::find_all(root, &Query::tag("nav").with_class("navISBDMSection"))
}

/// Direct `div.d-flex` rows of a sidebar container.
pub(crate) fn sidebar_rows(container: &Handle) -> Vec<SidebarRow> {
    dom::find_children(container, &Query::tag("div").with_class("d-flex"))
        .iter()
        .map(|row| {
            let link = dom::find_first(row, &Query::tag("a").with_attr("href"));
            SidebarRow {
                href: link
                    .as_ref()
                    .and_then(|a| dom::attr(a, "href"))
                    .map(|href| href.trim().to_string()),
                label: link
                    .as_ref()
                    .map(|a| text::normalize_text(&dom::text_content(a)))
                    .unwrap_or_default(),
                indent: dom::find_all(row, &Query::tag("i").with_class("bi-arrow-return-right"))
                    .len(),
            }
        })
        .collect()
}

/// Read the sidebar rows of one source page.
///
/// Only rows carrying a link are counted. Rows whose href cannot be turned into a key are
/// skipped with a warning but keep their position slot.
pub fn parse_sidebar_nav(
    html: &str,
    source: &str,
    ctx: &KeyContext<'_>,
) -> Result<Vec<RawNavEntry>, BabelError> {
    let document = dom::parse_document(html)?;
    let mut entries = Vec::new();
    let mut position = 0;

    for container in sidebar_containers(&document.document) {
        for row in sidebar_rows(&container) {
            let Some(href) = row.href else {
                continue;
            };
            position += 1;
            let Some(normalized_key) = text::normalize_href_to_key(&href, ctx) else {
                tracing::warn!(
                    "Could not normalize href '{}' in {} for context '{}', skipping '{}'",
                    href,
                    source,
                    ctx.context,
                    row.label
                );
                continue;
            };
            entries.push(RawNavEntry {
                source_reference: format!("{source}#{position}"),
                normalized_key,
                label: row.label,
                local_indent: row.indent,
                position,
                original_href: href,
            });
        }
    }

    tracing::debug!("Read {} sidebar rows from {}", entries.len(), source);
    Ok(entries)
}
