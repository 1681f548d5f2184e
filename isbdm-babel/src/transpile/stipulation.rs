//! Stipulation blocks (`div.stip`)
//!
//! A stipulation mixes paragraphs, lists, cross-reference callouts and a collapsible examples
//! block in document order. [`BlockState`] tracks the kind of the last typed child and decides
//! where a blank separator goes before the next one.
//!
//! Examples render as running property/value tables. Annotation rows and `hr` markers close the
//! running table, so the next label/value row opens a fresh one with its own header.

use super::inline::{InlineContext, InlineRewriter};
use super::{callout_lines, snippet, Diagnostics, Lines, TranspileOptions};
use crate::assemble::{is_blank, tidy};
use crate::dom::{self, Query};
use crate::text::normalize_text;
use markup5ever_rcdom::{Handle, NodeData};
use std::rc::Rc;

const TABLE_HEADER: &str = "    | Property | Value |";
const TABLE_SEPARATOR: &str = "    |:---------|:------|";
const EXAMPLE_INDENT: &str = "    ";

/// Kind of the last typed child of a stipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    None,
    Paragraph,
    List,
    Examples,
    CrossReference,
}

/// Separator state machine for stipulation children.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockState {
    last: BlockKind,
}

impl BlockState {
    pub fn last(&self) -> BlockKind {
        self.last
    }

    /// Whether a blank line goes before a child of `next` kind.
    ///
    /// Paragraphs follow paragraphs and lists follow lists without a gap. Examples and callouts
    /// always stand apart.
    pub fn needs_separator(&self, next: BlockKind) -> bool {
        match next {
            BlockKind::None => false,
            BlockKind::Paragraph => !matches!(self.last, BlockKind::None | BlockKind::Paragraph),
            BlockKind::List => self.last != BlockKind::List,
            BlockKind::Examples | BlockKind::CrossReference => true,
        }
    }

    pub fn advance(&mut self, kind: BlockKind) {
        if kind != BlockKind::None {
            self.last = kind;
        }
    }
}

enum StipChild {
    Text(String),
    Paragraph(Handle),
    List { node: Handle, ordered: bool },
    CrossReference(Handle),
    Examples(Handle),
    MandatoryRow,
    Other(Handle),
    Skip,
}

impl StipChild {
    fn classify(node: &Handle) -> Self {
        match &node.data {
            NodeData::Text { contents } => {
                let text = normalize_text(&contents.borrow());
                if text.is_empty() {
                    StipChild::Skip
                } else {
                    StipChild::Text(text)
                }
            }
            NodeData::Element { .. } => {
                let name = dom::element_name(node).unwrap_or_default();
                if name == "p" {
                    StipChild::Paragraph(node.clone())
                } else if name == "ol" || name == "ul" {
                    StipChild::List {
                        node: node.clone(),
                        ordered: name == "ol",
                    }
                } else if dom::has_class(node, "seeAlso") && !dom::has_class(node, "seeAlsoAdd") {
                    StipChild::CrossReference(node.clone())
                } else if dom::has_class(node, "xampleBlockStip") {
                    StipChild::Examples(node.clone())
                } else if name == "div"
                    && dom::has_class(node, "d-flex")
                    && dom::has_class(node, "flexrow")
                    && dom::contains(node, &Query::tag("div").with_class("mandatory"))
                {
                    StipChild::MandatoryRow
                } else {
                    StipChild::Other(node.clone())
                }
            }
            _ => StipChild::Skip,
        }
    }

    fn kind(&self) -> BlockKind {
        match self {
            StipChild::Text(_) | StipChild::Paragraph(_) => BlockKind::Paragraph,
            StipChild::List { .. } => BlockKind::List,
            StipChild::CrossReference(_) => BlockKind::CrossReference,
            StipChild::Examples(_) => BlockKind::Examples,
            StipChild::MandatoryRow | StipChild::Other(_) | StipChild::Skip => BlockKind::None,
        }
    }
}

/// Render a stipulation block as `<div className="stip">` lines.
pub(crate) fn render_stipulation(
    node: &Handle,
    options: &TranspileOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let mut body = Lines::default();
    if dom::contains(node, &Query::tag("div").with_class("mandatory")) {
        body.push("<Mandatory />");
        body.push("");
    }

    let children: Vec<StipChild> = dom::children(node)
        .iter()
        .map(StipChild::classify)
        .filter(|child| !matches!(child, StipChild::Skip))
        .collect();
    let mut state = BlockState::default();
    let count = children.len();

    for (index, child) in children.into_iter().enumerate() {
        let kind = child.kind();
        if !body.last_is_blank() && state.needs_separator(kind) {
            body.push("");
        }
        match child {
            StipChild::Text(text) => body.push(text),
            StipChild::Paragraph(p) => {
                let rewriter = InlineRewriter::new(options, InlineContext::Body);
                body.push(rewriter.line(&p, diagnostics));
            }
            StipChild::List { node, ordered } => {
                for (number, item) in dom::find_children(&node, &Query::tag("li"))
                    .iter()
                    .enumerate()
                {
                    let text = normalize_text(&dom::text_content(item));
                    if ordered {
                        body.push(format!("  {}. {}", number + 1, text));
                    } else {
                        body.push(format!("  - {text}"));
                    }
                }
            }
            StipChild::CrossReference(group) => {
                let paragraphs = dom::find_all(&group, &Query::tag("p"));
                if paragraphs.is_empty() {
                    diagnostics.warn(format!(
                        "div.seeAlso inside stipulation without any <p>: {}",
                        snippet(&dom::outer_html(&group), 50)
                    ));
                }
                for line in callout_lines(&paragraphs, options, diagnostics) {
                    body.push(line);
                }
            }
            StipChild::Examples(block) => render_examples(&block, &mut body, options, diagnostics),
            StipChild::MandatoryRow => {}
            StipChild::Other(other) => {
                let markup = dom::outer_html(&other);
                diagnostics.warn(format!(
                    "Unrecognized tag '{}' inside div.stip: {}",
                    dom::element_name(&other).unwrap_or_default(),
                    snippet(&markup, 100)
                ));
                body.push(markup.trim().to_string());
            }
            StipChild::Skip => {}
        }
        state.advance(kind);
        if kind != BlockKind::None && index + 1 < count {
            body.blank();
        }
    }

    let mut lines = vec![r#"<div className="stip">"#.to_string()];
    for line in tidy(body.as_slice()) {
        if is_blank(&line) {
            lines.push(String::new());
        } else {
            lines.push(format!("  {line}"));
        }
    }
    lines.push("</div>".to_string());
    lines
}

fn render_examples(
    block: &Handle,
    body: &mut Lines,
    options: &TranspileOptions,
    diagnostics: &mut Diagnostics,
) {
    body.push("<details>");
    body.push("  <summary>Examples</summary>");
    body.push("");

    match dom::find_first(block, &Query::tag("div").with_class("xamples")) {
        Some(examples) => {
            let mut table = ExampleTable::new(options);
            table.render(&examples, diagnostics);
            for line in table.lines.into_inner() {
                body.push(line);
            }
        }
        None => diagnostics.warn("Examples block without div.xamples"),
    }

    body.push("</details>");
}

/// Running property/value table of one examples block.
struct ExampleTable<'a> {
    options: &'a TranspileOptions,
    lines: Lines,
    fresh: bool,
}

impl<'a> ExampleTable<'a> {
    fn new(options: &'a TranspileOptions) -> Self {
        Self {
            options,
            lines: Lines::default(),
            fresh: true,
        }
    }

    fn render(&mut self, examples: &Handle, diagnostics: &mut Diagnostics) {
        let nodes = dom::element_children(examples);
        let row_group = Query::tag("div").with_class("row").with_class("px-2");
        let xamples = Query::tag("div").with_class("xamples");

        for (index, node) in nodes.iter().enumerate() {
            let next_is_rule = nodes.get(index + 1).is_some_and(|n| dom::is_tag(n, "hr"));
            let is_last = index + 1 == nodes.len();

            if dom::is_tag(node, "hr") {
                self.lines.push(format!("{EXAMPLE_INDENT}<hr />"));
                self.fresh = true;
                if !is_last && !next_is_rule {
                    self.lines.push("");
                }
                continue;
            }

            if !dom::is_tag(node, "div") {
                let markup = dom::outer_html(node);
                diagnostics.warn(format!(
                    "Unrecognized tag '{}' directly inside div.xamples: {}",
                    dom::element_name(node).unwrap_or_default(),
                    snippet(&markup, 100)
                ));
                self.lines.blank();
                self.lines.push(format!("{EXAMPLE_INDENT}{}", markup.trim()));
                self.lines.push("");
                continue;
            }

            let rows = if row_group.matches(node) {
                vec![node.clone()]
            } else {
                dom::find_all(node, &Query::tag("div").with_class("row"))
                    .into_iter()
                    .filter(|row| {
                        dom::closest(row, &xamples).is_some_and(|owner| Rc::ptr_eq(&owner, examples))
                    })
                    .collect()
            };
            if rows.is_empty() {
                continue;
            }

            for row in &rows {
                self.row(row, diagnostics);
            }

            if !self.lines.last_is_blank() && (is_last || !next_is_rule) {
                self.lines.push("");
            }
        }
    }

    fn row(&mut self, row: &Handle, diagnostics: &mut Diagnostics) {
        let label = dom::find_first(row, &Query::class("xampleLabel"));
        let value = dom::find_first(row, &Query::class("xampleValue"));
        let comment = dom::find_first(row, &Query::class("editComment"));

        match (label, value, comment) {
            (Some(label), Some(value), _) => {
                if self.fresh {
                    self.lines.blank();
                    self.lines.push(TABLE_HEADER);
                    self.lines.push(TABLE_SEPARATOR);
                    self.fresh = false;
                }
                let property = escape_cell(&normalize_text(&dom::text_content(&label)));
                let rewriter = InlineRewriter::new(self.options, InlineContext::Body);
                let value = escape_cell(&rewriter.line(&value, diagnostics));
                self.lines.push(format!("{EXAMPLE_INDENT}| {property} | {value} |"));
            }
            (_, _, Some(comment)) => {
                if self.lines.last().is_some_and(|line| line.trim_end().ends_with('|')) {
                    self.lines.push("");
                }
                let rewriter = InlineRewriter::new(self.options, InlineContext::Body);
                let children = rewriter.children(&comment, diagnostics);
                let raw = children.trim();
                let annotation = match raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                    Some(inner) => Some(format!("*[{}]*", normalize_text(inner))),
                    None => {
                        let text = normalize_text(raw);
                        (!text.is_empty()).then(|| format!("*{text}*"))
                    }
                };
                if let Some(annotation) = annotation {
                    self.lines.push(format!("{EXAMPLE_INDENT}{annotation}"));
                }
                self.fresh = true;
            }
            _ => diagnostics.warn(format!(
                "Unrecognized row structure inside example: {}",
                snippet(&dom::outer_html(row), 200)
            )),
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
