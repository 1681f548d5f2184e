//! Element tree adapter over `html5ever` + `markup5ever_rcdom`
//!
//! The conversion code never touches the parser directly. It goes through the helpers here:
//! parse a page into an [`RcDom`], then navigate handles by tag, class and attribute with a
//! tiny selector model ([`Query`] for one compound selector, [`Selector`] for `a b` and
//! `a > b` chains).
//!
//! Text content follows the browser notion: the concatenation of every descendant text node,
//! entities already decoded by the parser.

use crate::error::BabelError;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document as parse_html5, serialize, serialize::SerializeOpts};
use html5ever::{serialize::TraversalScope, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use std::rc::Rc;

/// Parse an HTML page into a navigable tree.
pub fn parse_document(html: &str) -> Result<RcDom, BabelError> {
    parse_html5(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| BabelError::Parse(format!("HTML parsing failed: {e}")))
}

/// Local tag name of an element node, `None` for text, comments and the document.
pub fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

pub fn is_tag(node: &Handle, tag: &str) -> bool {
    element_name(node) == Some(tag)
}

pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().iter().any(|a| &*a.name.local == name),
        _ => false,
    }
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// All child nodes, text and comments included.
pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

/// Every descendant in document order, excluding `node` itself.
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    collect_descendants(node, &mut out);
    out
}

fn collect_descendants(node: &Handle, out: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        out.push(child.clone());
        collect_descendants(child, out);
    }
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let strong = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    strong
}

/// Nearest ancestor (excluding `node`) matching `query`.
pub fn closest(node: &Handle, query: &Query) -> Option<Handle> {
    let mut current = parent(node);
    while let Some(candidate) = current {
        if query.matches(&candidate) {
            return Some(candidate);
        }
        current = parent(&candidate);
    }
    None
}

/// Element siblings following `node`, in document order.
pub fn following_element_siblings(node: &Handle) -> Vec<Handle> {
    let Some(parent) = parent(node) else {
        return Vec::new();
    };
    let siblings = parent.children.borrow();
    siblings
        .iter()
        .skip_while(|sibling| !Rc::ptr_eq(sibling, node))
        .skip(1)
        .filter(|sibling| is_element(sibling))
        .cloned()
        .collect()
}

pub fn next_element_sibling(node: &Handle) -> Option<Handle> {
    following_element_siblings(node).into_iter().next()
}

/// First descendant matching `query`.
pub fn find_first(node: &Handle, query: &Query) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if query.matches(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, query) {
            return Some(found);
        }
    }
    None
}

pub fn find_all(node: &Handle, query: &Query) -> Vec<Handle> {
    descendants(node)
        .into_iter()
        .filter(|candidate| query.matches(candidate))
        .collect()
}

/// Direct children matching `query`.
pub fn find_children(node: &Handle, query: &Query) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| query.matches(child))
        .cloned()
        .collect()
}

pub fn contains(node: &Handle, query: &Query) -> bool {
    find_first(node, query).is_some()
}

/// Concatenated descendant text.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    push_text(node, &mut out);
    out
}

fn push_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        push_text(child, out);
    }
}

/// Markup of `node` itself, tags included.
pub fn outer_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::IncludeNode)
}

/// Markup of the children of `node`.
pub fn inner_html(node: &Handle) -> String {
    serialize_node(node, TraversalScope::ChildrenOnly(None))
}

fn serialize_node(node: &Handle, traversal_scope: TraversalScope) -> String {
    let mut output = Vec::new();
    let serializable = SerializableHandle::from(node.clone());
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    match serialize(&mut output, &serializable, opts) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(e) => {
            tracing::warn!("HTML serialization failed: {e}");
            String::new()
        }
    }
}

/// A compound selector: optional tag, required classes, required attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tag: Option<&'static str>,
    classes: Vec<&'static str>,
    attr: Option<&'static str>,
}

impl Query {
    pub fn tag(tag: &'static str) -> Self {
        Self {
            tag: Some(tag),
            ..Self::default()
        }
    }

    pub fn class(class: &'static str) -> Self {
        Self {
            classes: vec![class],
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_attr(mut self, attr: &'static str) -> Self {
        self.attr = Some(attr);
        self
    }

    pub fn matches(&self, node: &Handle) -> bool {
        let Some(name) = element_name(node) else {
            return false;
        };
        if let Some(tag) = self.tag {
            if name != tag {
                return false;
            }
        }
        if let Some(attr) = self.attr {
            if !has_attr(node, attr) {
                return false;
            }
        }
        self.classes.iter().all(|class| has_class(node, class))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// A chain of compound selectors joined by descendant (`a b`) or child (`a > b`) combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    steps: Vec<(Combinator, Query)>,
}

impl Selector {
    pub fn new(query: Query) -> Self {
        Self {
            steps: vec![(Combinator::Descendant, query)],
        }
    }

    pub fn descendant(mut self, query: Query) -> Self {
        self.steps.push((Combinator::Descendant, query));
        self
    }

    pub fn child(mut self, query: Query) -> Self {
        self.steps.push((Combinator::Child, query));
        self
    }

    pub fn matches(&self, node: &Handle) -> bool {
        self.matches_step(node, self.steps.len() - 1)
    }

    fn matches_step(&self, node: &Handle, index: usize) -> bool {
        let (combinator, query) = &self.steps[index];
        if !query.matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => {
                parent(node).is_some_and(|parent| self.matches_step(&parent, index - 1))
            }
            Combinator::Descendant => {
                let mut current = parent(node);
                while let Some(ancestor) = current {
                    if self.matches_step(&ancestor, index - 1) {
                        return true;
                    }
                    current = parent(&ancestor);
                }
                false
            }
        }
    }

    /// All descendants of `root` matching the selector, in document order.
    pub fn select(&self, root: &Handle) -> Vec<Handle> {
        descendants(root)
            .into_iter()
            .filter(|node| self.matches(node))
            .collect()
    }

    pub fn select_first(&self, root: &Handle) -> Option<Handle> {
        descendants(root).into_iter().find(|node| self.matches(node))
    }
}
