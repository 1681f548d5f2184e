//! Element reference pages: front-matter header, definition block, stipulation and examples.

use crate::common::fixture;
use insta::assert_snapshot;
use isbdm_babel::transpile::Severity;
use isbdm_babel::{transpile, DocumentContext, TranspileOptions, Transpiled};

fn convert() -> Transpiled {
    let html = fixture("attributes_1025.html");
    let document = DocumentContext::new("1025.html", Some("attributes".into()));
    transpile(&html, &document, &TranspileOptions::default()).unwrap()
}

fn body_of(text: &str) -> &str {
    let start = text.find("\n# has title proper\n").unwrap() + 1;
    &text[start..]
}

#[test]
fn test_sidebar_position_from_active_link() {
    let converted = convert();
    assert_eq!(converted.position, 2);
    assert_eq!(converted.depth, 2);
    assert!(converted
        .diagnostics
        .iter()
        .all(|d| d.severity != Severity::Warning));
}

#[test]
fn test_reference_rows() {
    let reference = convert().reference.unwrap();
    assert_eq!(reference.id, "1025");
    assert_eq!(reference.title, "has title proper");
    assert_eq!(reference.definition, "Relates a manifestation to its title.");
    assert_eq!(reference.scope_note, r#"Includes "alternative" forms."#);
    assert_eq!(reference.domain, "Manifestation");
    assert_eq!(reference.range, "Literal");

    assert_eq!(reference.sub_types.len(), 1);
    let sub = &reference.sub_types[0];
    assert_eq!(sub.uri, "http://iflastandards.info/ns/isbdm/elements/P1026");
    assert_eq!(sub.url, "/docs/attributes/1026");
    assert_eq!(sub.label, "has parallel title");

    let sup = reference.super_type.unwrap();
    assert_eq!(sup.uri, "http://iflastandards.info/ns/isbdm/elements/P1024");
    assert_eq!(sup.label, "has title");
}

#[test]
fn test_header_comes_first() {
    let text = convert().text;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "---");
    assert_eq!(lines[1], "# Docusaurus-specific fields");
    assert_eq!(lines[2], "id: 1025");
    assert_eq!(lines[3], "title: has title proper");
    assert!(lines[4].starts_with("sidebar_position: 2"));
    assert!(lines[5].starts_with("sidebar_level: 2"));
    assert!(text.contains("  scopeNote: \"Includes \\\"alternative\\\" forms.\"\n"));
    assert!(text.contains("    label: has title\n"));
}

#[test]
fn test_element_body() {
    let converted = convert();
    assert_snapshot!(body_of(&converted.text), @r##"
# has title proper

## Element Reference
<ElementReference frontMatter={frontMatter} />

## Definition

<div className="guid">Relates a manifestation to a <InLink href="docs/glossary/1001">title</InLink>.</div>

<div className="stip">
  <Mandatory />

  Record a title proper.

  <details>
    <summary>Examples</summary>

      | Property | Value |
      |:---------|:------|
      | has title proper | Hamlet |
      | has extent | 1 volume |

      *[Title from cover]*

      | Property | Value |
      |:---------|:------|
      | has note on manifestation | a \| b |

  </details>
</div>
"##);
}

#[test]
fn test_annotation_splits_tables() {
    let text = convert().text;
    assert_eq!(text.matches("| Property | Value |").count(), 2);
    assert!(text.ends_with("</div>\n"));
    assert!(!text.ends_with("\n\n"));
}
