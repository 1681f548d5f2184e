//! Inline fragment rewriting
//!
//! | source                                      | output                        |
//! |---------------------------------------------|-------------------------------|
//! | `<a class="linkInline" href="/ISBDM/docs/x.html">t</a>` | `<InLink href="docs/x">t</InLink>` |
//! | `<span class="bolded">t</span>`             | `**t**`                       |
//! | `<i>…</i>`, `<em>…</em>`                    | `*…*` (contents rewritten)    |
//! | `<br>`                                      | a space                       |
//! | any other element                           | its markup, recorded          |
//!
//! Callout context additionally turns `a.linkMenuElement` into cross references. The result is
//! not whitespace-normalized; callers do that once on the whole fragment.

use super::{Diagnostics, TranspileOptions};
use crate::dom;
use crate::text::{normalize_text, rewrite_link_href, typographic};
use markup5ever_rcdom::{Handle, NodeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineContext {
    Body,
    Callout,
}

pub(crate) struct InlineRewriter<'a> {
    options: &'a TranspileOptions,
    context: InlineContext,
}

impl<'a> InlineRewriter<'a> {
    pub fn new(options: &'a TranspileOptions, context: InlineContext) -> Self {
        Self { options, context }
    }

    /// Rewrite the children of `node` and normalize whitespace.
    pub fn line(&self, node: &Handle, diagnostics: &mut Diagnostics) -> String {
        normalize_text(&self.children(node, diagnostics))
    }

    /// Rewrite the children of `node`.
    pub fn children(&self, node: &Handle, diagnostics: &mut Diagnostics) -> String {
        let mut out = String::new();
        for child in dom::children(node) {
            self.rewrite(&child, &mut out, diagnostics);
        }
        typographic(&out)
    }

    fn rewrite(&self, node: &Handle, out: &mut String, diagnostics: &mut Diagnostics) {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => self.rewrite_element(node, out, diagnostics),
            _ => {}
        }
    }

    fn rewrite_element(&self, node: &Handle, out: &mut String, diagnostics: &mut Diagnostics) {
        let name = dom::element_name(node).unwrap_or_default();
        match name {
            "a" if self.is_cross_reference(node) => {
                let href = dom::attr(node, "href").unwrap_or_default();
                let target =
                    rewrite_link_href(&href, &self.options.site_prefix, &self.options.docs_prefix);
                let label = normalize_text(&dom::text_content(node));
                out.push_str(&format!(r#"<InLink href="{target}">{label}</InLink>"#));
            }
            "span" if dom::has_class(node, "bolded") || dom::has_class(node, "bolder") => {
                out.push_str(&format!("**{}**", normalize_text(&dom::text_content(node))));
            }
            "i" | "em" => {
                out.push('*');
                for child in dom::children(node) {
                    self.rewrite(&child, out, diagnostics);
                }
                out.push('*');
            }
            "br" => out.push(' '),
            _ => {
                let markup = dom::outer_html(node);
                diagnostics.pass_through(format!(
                    "Kept tag '{}' in fragment: {}",
                    name,
                    super::snippet(&markup, 50)
                ));
                out.push_str(&markup);
            }
        }
    }

    fn is_cross_reference(&self, node: &Handle) -> bool {
        dom::has_class(node, "linkInline")
            || (self.context == InlineContext::Callout && dom::has_class(node, "linkMenuElement"))
    }
}
