//! Element reference pages
//!
//! A page is an element reference when its main column holds an `h4` reading
//! "Element reference". The metadata sits in the next `div.px-4` sibling as label/value rows:
//!
//! ```text
//! <div class="px-4">
//!   <div class="row"><div class="elref">Definition</div><div class="eltext">…</div></div>
//!   <div class="row"><div class="elref">Element sub-type</div><div class="eltext">links</div></div>
//! </div>
//! ```

use super::{snippet, Diagnostics, TranspileOptions};
use crate::dom::{self, Query, Selector};
use crate::text::normalize_text;
use markup5ever_rcdom::Handle;
use serde::Serialize;

pub const UNKNOWN_ID: &str = "UNKNOWN_ID";
const HEADING_SIGNATURE: &str = "Element reference";

/// A related element linked from the reference block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedElement {
    pub uri: String,
    pub url: String,
    pub label: String,
}

/// Metadata of an element reference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementReference {
    pub id: String,
    pub title: String,
    pub sidebar_position: usize,
    pub sidebar_level: usize,
    pub definition: String,
    pub scope_note: String,
    pub domain: String,
    pub range: String,
    pub sub_types: Vec<RelatedElement>,
    pub super_type: Option<RelatedElement>,
}

impl ElementReference {
    pub fn new(id: String, title: String, sidebar_position: usize, sidebar_level: usize) -> Self {
        Self {
            id,
            title,
            sidebar_position,
            sidebar_level,
            definition: String::new(),
            scope_note: String::new(),
            domain: String::new(),
            range: String::new(),
            sub_types: Vec::new(),
            super_type: None,
        }
    }

    /// YAML header lines, fixed key order, including the closing `---`.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "---".to_string(),
            "# Docusaurus-specific fields".to_string(),
            format!("id: {}", self.id),
            format!("title: {}", self.title),
            format!("sidebar_position: {}  # position in the section sidebar", self.sidebar_position),
            format!("sidebar_level: {}  # depth in the section sidebar", self.sidebar_level),
            "aliases:".to_string(),
            format!("  - /elements/P{} # legacy element path", self.id),
            String::new(),
            "# Docusaurus defaults (uncomment to override)".to_string(),
            "# slug: /custom-path".to_string(),
            "# sidebar_label: Custom label".to_string(),
            String::new(),
            "# Core element metadata".to_string(),
            "RDF:".to_string(),
            "  # Required properties".to_string(),
            format!("  id: {}", self.id),
            "  # uri: derived from id".to_string(),
            "  # label: derived from title".to_string(),
            format!("  definition: {}", self.definition),
            format!("  domain: {}", self.domain),
            format!("  range: {}", self.range),
            "  type: DatatypeProperty".to_string(),
            "  # Optional properties".to_string(),
            format!("  scopeNote: \"{}\"", self.scope_note.replace('"', "\\\"")),
            String::new(),
            "  # Relationships between elements".to_string(),
            "  elementSubType:".to_string(),
        ];
        if self.sub_types.is_empty() {
            lines.push("    []".to_string());
        } else {
            for sub in &self.sub_types {
                lines.push(format!("    - uri: {}", sub.uri));
                lines.push(format!("      url: {}", sub.url));
                lines.push(format!("      label: {}", sub.label));
            }
        }
        lines.push("  elementSuperType:".to_string());
        if let Some(sup) = &self.super_type {
            lines.push(format!("    uri: {}", sup.uri));
            lines.push(format!("    url: {}", sup.url));
            lines.push(format!("    label: {}", sup.label));
        }
        lines.extend(
            [
                "  equivalentProperty: []",
                "  inverseOf: []",
                "",
                "# Status and provenance",
                "#  status: published",
                "#  isDefinedBy: element set namespace",
                "",
                "# Deprecation information",
                "deprecated: \"\" # set to \"true\" when deprecated",
                "deprecatedInVersion: \"\" # version that deprecated the element",
                "willBeRemovedInVersion: \"\" # version that removes the element",
                "---",
                "",
            ]
            .map(String::from),
        );
        lines
    }
}

/// The reference heading of a page, if it has one.
pub(crate) fn find_reference_heading(root: &Handle) -> Option<Handle> {
    Selector::new(Query::tag("div").with_class("col-md-7"))
        .descendant(Query::tag("h4"))
        .select(root)
        .into_iter()
        .find(|h4| dom::text_content(h4).contains(HEADING_SIGNATURE))
}

/// Element id from a page file name: the digits right before `.html`.
pub fn element_id(file_name: &str) -> String {
    let Some(stem) = file_name.strip_suffix(".html") else {
        return UNKNOWN_ID.to_string();
    };
    let digits: String = stem
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        UNKNOWN_ID.to_string()
    } else {
        digits
    }
}

/// Fill `reference` from the metadata rows following `heading`.
pub(crate) fn read_reference_rows(
    heading: &Handle,
    reference: &mut ElementReference,
    options: &TranspileOptions,
    diagnostics: &mut Diagnostics,
) {
    let container_query = Query::tag("div").with_class("px-4");
    let Some(container) = dom::following_element_siblings(heading)
        .into_iter()
        .find(|sibling| container_query.matches(sibling))
    else {
        diagnostics.warn("'Element reference' heading found without its div.px-4 container");
        return;
    };

    for row in dom::find_children(&container, &Query::tag("div").with_class("row")) {
        let label = dom::find_first(&row, &Query::tag("div").with_class("elref"));
        let value = dom::find_first(&row, &Query::tag("div").with_class("eltext"));
        let (Some(label), Some(value)) = (label, value) else {
            diagnostics.warn(format!(
                "Unexpected structure in Element Reference row: {}",
                snippet(&dom::outer_html(&row), 100)
            ));
            continue;
        };

        let key: String = dom::text_content(&label)
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        let text = normalize_text(&dom::text_content(&value));
        match key.as_str() {
            "definition" => reference.definition = text,
            "scopenote" => reference.scope_note = text,
            "domain" => reference.domain = text,
            "range" => reference.range = text,
            "elementsubtype" => reference.sub_types = related_elements(&value, options),
            "elementsupertype" => {
                reference.super_type = related_elements(&value, options).into_iter().next()
            }
            other => tracing::debug!("Ignoring element reference label '{}'", other),
        }
    }
}

/// Related elements linked from a value cell.
pub(crate) fn related_elements(cell: &Handle, options: &TranspileOptions) -> Vec<RelatedElement> {
    dom::find_all(cell, &Query::tag("a").with_class("linkMenuElement"))
        .iter()
        .map(|link| {
            let href = dom::attr(link, "href").unwrap_or_default();
            let url = related_url(&href, options);
            let id = url.rsplit('/').next().unwrap_or_default().to_string();
            let category = if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
                'P'
            } else {
                'C'
            };
            RelatedElement {
                uri: format!("{}{}{}", options.element_uri_base, category, id),
                url,
                label: normalize_text(&dom::text_content(link)),
            }
        })
        .collect()
}

/// Target url of a related element link.
///
/// Links under the site prefix move under the docs prefix. Links under the site base (the site
/// prefix without its last segment, `/ISBDM`) move under the docs base (`/docs`).
fn related_url(href: &str, options: &TranspileOptions) -> String {
    let site_prefix = options.site_prefix.as_str();
    if !site_prefix.is_empty() {
        if let Some(rest) = href.strip_prefix(site_prefix) {
            return format!("{}{}", options.docs_prefix, rest).replace(".html", "");
        }
    }
    let site_base = parent_prefix(site_prefix);
    if !site_base.is_empty() {
        if let Some(rest) = href.strip_prefix(site_base) {
            if rest.starts_with('/') {
                let docs_base = options.docs_prefix.trim_end_matches('/');
                return format!("{docs_base}{rest}").replace(".html", "");
            }
        }
    }
    href.replace(".html", "")
}

fn parent_prefix(prefix: &str) -> &str {
    prefix
        .trim_end_matches('/')
        .rsplit_once('/')
        .map(|(parent, _)| parent)
        .unwrap_or("")
}
