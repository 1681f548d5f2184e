//! Top-level block classification of the main content column.

use crate::dom;
use markup5ever_rcdom::Handle;

/// How a top-level content node is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// `h4`
    Heading,
    /// `p` outside definition and callout containers
    Paragraph,
    /// `.guid`
    Definition,
    /// `.seeAlsoAdd`
    Callout,
    /// `.seeAlso`
    CalloutGroup,
    /// `hr`
    Rule,
    /// `.stip`
    Stipulation,
    /// Markup with no visible content (`script`, `style`, `meta`, `link`, `title`)
    Ignored,
    Unrecognized,
}

const IGNORED_TAGS: &[&str] = &["script", "style", "meta", "link", "title"];
const CALLOUT_CONTAINERS: &[&str] = &["guid", "seeAlsoAdd", "seeAlso"];

impl Block {
    pub fn classify(node: &Handle) -> Self {
        let Some(name) = dom::element_name(node) else {
            return Block::Ignored;
        };
        if name == "h4" {
            Block::Heading
        } else if name == "p" && !inside_callout(node) {
            Block::Paragraph
        } else if dom::has_class(node, "guid") {
            Block::Definition
        } else if dom::has_class(node, "seeAlsoAdd") {
            Block::Callout
        } else if dom::has_class(node, "seeAlso") {
            Block::CalloutGroup
        } else if name == "hr" {
            Block::Rule
        } else if dom::has_class(node, "stip") {
            Block::Stipulation
        } else if IGNORED_TAGS.contains(&name) {
            Block::Ignored
        } else {
            Block::Unrecognized
        }
    }
}

fn inside_callout(node: &Handle) -> bool {
    dom::parent(node).is_some_and(|parent| {
        CALLOUT_CONTAINERS
            .iter()
            .any(|class| dom::has_class(&parent, class))
    })
}
