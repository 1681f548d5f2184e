//! Structural HTML to MDX transpiler
//!
//! Converts one source page into a Docusaurus MDX document. The walk goes in this order:
//!
//! 1. Find the page's own row in its embedded sidebar to get its position and depth.
//! 2. Detect element reference pages and read their metadata block ([`reference`]).
//! 3. Pick the title.
//! 4. Emit the header (a YAML block for reference pages) and the title heading.
//! 5. Walk the content blocks after the title or reference block, classify each one once
//!    ([`Block`]) and render it.
//!
//! Links are only rewritten textually. Structural surprises become [`Diagnostic`]s; only a page
//! that cannot be parsed at all is an error.

pub mod classify;
pub(crate) mod inline;
pub mod reference;
pub mod stipulation;

use crate::assemble::{assemble, is_blank};
use crate::dom::{self, Query, Selector};
use crate::error::BabelError;
use crate::nav::{sidebar_containers, sidebar_rows};
use crate::text::normalize_text;
use inline::{InlineContext, InlineRewriter};
use markup5ever_rcdom::Handle;
use std::rc::Rc;

pub use classify::Block;
pub use reference::{element_id, ElementReference, RelatedElement};
pub use stipulation::{BlockKind, BlockState};

/// Where the page being converted lives in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    /// File name, `1022.html`.
    pub file_name: String,
    /// Directory relative to the HTML root, `attributes`. Empty for root pages.
    pub subdirectory: Option<String>,
}

impl DocumentContext {
    pub fn new(file_name: impl Into<String>, subdirectory: Option<String>) -> Self {
        Self {
            file_name: file_name.into(),
            subdirectory: subdirectory.filter(|dir| !dir.is_empty() && dir != "."),
        }
    }

    /// Href the page's own sidebar row links to.
    pub fn active_href(&self, site_prefix: &str) -> String {
        match &self.subdirectory {
            Some(dir) => format!("{site_prefix}{dir}/{}", self.file_name),
            None => format!("{site_prefix}{}", self.file_name),
        }
    }
}

/// Site-wide conversion settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileOptions {
    pub site_prefix: String,
    pub docs_prefix: String,
    pub element_uri_base: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            site_prefix: "/ISBDM/docs/".to_string(),
            docs_prefix: "/docs/".to_string(),
            element_uri_base: "http://iflastandards.info/ns/isbdm/elements/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Markup passed through as-is
    Debug,
    /// Structure that did not match what the converter expects
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Diagnostics of one document, de-duplicated in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn pass_through(&mut self, message: impl Into<String>) {
        self.push(Severity::Debug, message.into());
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    fn push(&mut self, severity: Severity, message: String) {
        let exists = self
            .items
            .iter()
            .any(|d| d.severity == severity && d.message == message);
        if !exists {
            self.items.push(Diagnostic { severity, message });
        }
    }

    fn emit(&self, file_name: &str) {
        for diagnostic in &self.items {
            match diagnostic.severity {
                Severity::Warning => tracing::warn!("{}: {}", file_name, diagnostic.message),
                Severity::Debug => tracing::debug!("{}: {}", file_name, diagnostic.message),
            }
        }
    }
}

/// Result of converting one page.
#[derive(Debug, Clone)]
pub struct Transpiled {
    pub text: String,
    pub position: usize,
    pub depth: usize,
    pub reference: Option<ElementReference>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Append-only output line buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Add a blank separator unless the buffer is empty or already ends blank.
    pub fn blank(&mut self) {
        if !self.last_is_blank() {
            self.lines.push(String::new());
        }
    }

    /// An empty buffer counts as ending blank.
    pub fn last_is_blank(&self) -> bool {
        self.lines.last().map_or(true, |line| is_blank(line))
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    pub fn into_inner(self) -> Vec<String> {
        self.lines
    }
}

/// First `max` characters of `text`.
pub(crate) fn snippet(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// One `<SeeAlso>` line per paragraph with content, blank-separated.
pub(crate) fn callout_lines(
    paragraphs: &[Handle],
    options: &TranspileOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let rewriter = InlineRewriter::new(options, InlineContext::Callout);
    let mut lines = Lines::default();
    for p in paragraphs {
        let text = rewriter.line(p, diagnostics);
        if !text.is_empty() {
            lines.blank();
            lines.push(format!("<SeeAlso>{text}</SeeAlso>"));
        }
    }
    lines.into_inner()
}

/// Convert one page.
pub fn transpile(
    html: &str,
    document: &DocumentContext,
    options: &TranspileOptions,
) -> Result<Transpiled, BabelError> {
    let parsed = dom::parse_document(html)?;
    let root = parsed.document.clone();
    let mut diagnostics = Diagnostics::default();

    let (position, depth) = active_navigation(&root, document, options, &mut diagnostics);

    let reference_heading = reference::find_reference_heading(&root);
    let title_node = find_title(&root);
    let title = title_node
        .as_ref()
        .map(|node| normalize_text(&dom::text_content(node)))
        .or_else(|| {
            dom::find_first(&root, &Query::tag("title"))
                .map(|node| normalize_text(&dom::text_content(&node)))
        })
        .unwrap_or_default();

    let reference = reference_heading.as_ref().map(|heading| {
        let mut reference = ElementReference::new(
            element_id(&document.file_name),
            title.clone(),
            position,
            depth,
        );
        reference::read_reference_rows(heading, &mut reference, options, &mut diagnostics);
        reference
    });

    let mut lines = Lines::default();
    if let Some(reference) = &reference {
        for line in reference.header_lines() {
            lines.push(line);
        }
    }
    lines.push(format!("# {title}"));
    lines.push("");
    if reference.is_some() {
        lines.push("## Element Reference");
        lines.push("<ElementReference frontMatter={frontMatter} />");
        lines.push("");
    }

    let nodes = content_nodes(
        &root,
        reference_heading.as_ref(),
        title_node.as_ref(),
        &mut diagnostics,
    );
    let mut walker = BodyWalker {
        options,
        title: title_node.as_ref(),
        title_text: &title,
        lines: &mut lines,
        diagnostics: &mut diagnostics,
    };
    for node in &nodes {
        walker.content_node(node);
    }

    let text = assemble(lines.as_slice());
    diagnostics.emit(&document.file_name);
    tracing::info!(
        "Converted {} (position {}, depth {}, {} warnings)",
        document.file_name,
        position,
        depth,
        diagnostics.warnings().count()
    );

    Ok(Transpiled {
        text,
        position,
        depth,
        reference,
        diagnostics: diagnostics.items,
    })
}

fn active_navigation(
    root: &Handle,
    document: &DocumentContext,
    options: &TranspileOptions,
    diagnostics: &mut Diagnostics,
) -> (usize, usize) {
    let target = document.active_href(&options.site_prefix);
    let found = sidebar_containers(root)
        .first()
        .and_then(|nav| {
            sidebar_rows(nav)
                .into_iter()
                .enumerate()
                .find(|(_, row)| row.href.as_deref() == Some(target.trim()))
        })
        .map(|(index, row)| (index + 1, row.indent + 1));

    found.unwrap_or_else(|| {
        diagnostics.warn(format!(
            "Active link '{}' for {} not found in sidebar",
            target, document.file_name
        ));
        (1, 1)
    })
}

fn find_title(root: &Handle) -> Option<Handle> {
    let title_row = || Query::tag("div").with_class("row").with_class("m-1");
    let column = || Query::tag("div").with_class("col-md-7");
    let main = || Query::tag("main").with_class("container");

    let candidates = [
        Selector::new(column())
            .child(title_row())
            .child(Query::tag("h3")),
        Selector::new(main())
            .descendant(title_row())
            .child(Query::tag("h3")),
    ];
    for selector in &candidates {
        let found = selector.select(root).into_iter().find(has_text);
        if found.is_some() {
            return found;
        }
    }

    let main_h1 = Selector::new(main()).descendant(Query::tag("h1"));
    let column_h1 = Selector::new(column()).descendant(Query::tag("h1"));
    dom::descendants(root)
        .into_iter()
        .filter(|node| main_h1.matches(node) || column_h1.matches(node))
        .find(has_text)
}

fn has_text(node: &Handle) -> bool {
    !normalize_text(&dom::text_content(node)).is_empty()
}

fn content_nodes(
    root: &Handle,
    reference_heading: Option<&Handle>,
    title: Option<&Handle>,
    diagnostics: &mut Diagnostics,
) -> Vec<Handle> {
    let column_query = Query::tag("div")
        .with_class("col-md-7")
        .with_class("border")
        .with_class("rounded");
    let Some(column) = dom::find_first(root, &column_query) else {
        diagnostics.warn("No main content column (div.col-md-7.border.rounded)");
        return Vec::new();
    };
    let row = Query::tag("div").with_class("row");

    if let Some(heading) = reference_heading {
        return match dom::closest(heading, &row) {
            Some(wrapper) => dom::following_element_siblings(&wrapper),
            None => Vec::new(),
        };
    }

    if let Some(title) = title {
        return match dom::closest(title, &row) {
            Some(wrapper) => {
                let mut nodes = dom::following_element_siblings(title);
                nodes.extend(dom::following_element_siblings(&wrapper));
                nodes
            }
            None => dom::following_element_siblings(title),
        };
    }

    let nodes = dom::element_children(&column);
    if nodes.is_empty() {
        diagnostics.warn("Could not find any starting node for main content");
    } else {
        diagnostics.warn("Using broad fallback for main content start node");
    }
    nodes
}

struct BodyWalker<'a> {
    options: &'a TranspileOptions,
    title: Option<&'a Handle>,
    title_text: &'a str,
    lines: &'a mut Lines,
    diagnostics: &'a mut Diagnostics,
}

impl BodyWalker<'_> {
    fn content_node(&mut self, node: &Handle) {
        let expands = dom::is_tag(node, "div")
            && dom::has_class(node, "row")
            && dom::has_class(node, "m-1");
        if expands {
            for child in dom::element_children(node) {
                self.block(&child);
            }
        } else {
            self.block(node);
        }
    }

    fn block(&mut self, node: &Handle) {
        if self.is_title(node) {
            return;
        }
        match Block::classify(node) {
            Block::Heading => {
                self.lines
                    .push(format!("## {}", normalize_text(&dom::text_content(node))));
            }
            Block::Paragraph => {
                let text = InlineRewriter::new(self.options, InlineContext::Body)
                    .line(node, self.diagnostics);
                if !text.is_empty() {
                    self.lines.push(text);
                }
            }
            Block::Definition => {
                let source = dom::find_first(node, &Query::tag("p")).unwrap_or_else(|| node.clone());
                let text = InlineRewriter::new(self.options, InlineContext::Body)
                    .line(&source, self.diagnostics);
                self.lines
                    .push(format!(r#"<div className="guid">{text}</div>"#));
            }
            Block::Callout => match dom::find_first(node, &Query::tag("p")) {
                Some(p) => {
                    for line in callout_lines(&[p], self.options, self.diagnostics) {
                        self.lines.push(line);
                    }
                }
                None => self.diagnostics.warn(format!(
                    "div.seeAlsoAdd without a <p>: {}",
                    snippet(&dom::outer_html(node), 50)
                )),
            },
            Block::CalloutGroup => {
                let paragraphs = dom::find_all(node, &Query::tag("p"));
                if paragraphs.is_empty() {
                    self.diagnostics.warn(format!(
                        "div.seeAlso without any <p>: {}",
                        snippet(&dom::outer_html(node), 50)
                    ));
                }
                self.lines.blank();
                for line in callout_lines(&paragraphs, self.options, self.diagnostics) {
                    self.lines.push(line);
                }
            }
            Block::Rule => self.lines.push("---"),
            Block::Stipulation => {
                self.lines.blank();
                for line in stipulation::render_stipulation(node, self.options, self.diagnostics) {
                    self.lines.push(line);
                }
            }
            Block::Ignored => {
                tracing::debug!(
                    "Skipping <{}> in main content",
                    dom::element_name(node).unwrap_or_default()
                );
                return;
            }
            Block::Unrecognized => {
                let markup = dom::outer_html(node);
                self.diagnostics.warn(format!(
                    "Unrecognized element '{}' in main content: {}",
                    dom::element_name(node).unwrap_or_default(),
                    snippet(&markup, 100)
                ));
                self.lines.blank();
                self.lines.push(markup.trim().to_string());
            }
        }
        self.lines.blank();
    }

    fn is_title(&self, node: &Handle) -> bool {
        self.title.is_some_and(|title| {
            Rc::ptr_eq(title, node) && normalize_text(&dom::text_content(node)) == self.title_text
        })
    }
}
