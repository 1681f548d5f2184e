//! Plain documentation pages and degraded input.

use crate::common::fixture;
use insta::assert_snapshot;
use isbdm_babel::transpile::Severity;
use isbdm_babel::{transpile, DocumentContext, TranspileOptions};

fn intro() -> isbdm_babel::Transpiled {
    let html = fixture("intro_i001.html");
    let document = DocumentContext::new("i001.html", Some("intro".into()));
    transpile(&html, &document, &TranspileOptions::default()).unwrap()
}

#[test]
fn test_plain_page() {
    let converted = intro();
    assert_eq!(converted.position, 2);
    assert_eq!(converted.depth, 2);
    assert!(converted.reference.is_none());
    assert_snapshot!(converted.text, @r##"
# Scope

The manual covers **all** published resources.

## Notes

<SeeAlso>See also <InLink href="docs/intro/i002">Structure</InLink></SeeAlso>

---

<SeeAlso><InLink href="docs/a">A</InLink></SeeAlso>

<SeeAlso><InLink href="docs/b">B</InLink></SeeAlso>

<aside>note</aside>
"##);
}

#[test]
fn test_unrecognized_markup_is_reported() {
    let warnings: Vec<_> = intro()
        .diagnostics
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("aside"));
}

#[test]
fn test_conversion_is_deterministic() {
    assert_eq!(intro().text, intro().text);
}

#[test]
fn test_missing_sidebar_defaults_position() {
    let html = r#"<html><body><main class="container"><div class="col-md-7 border rounded">
        <div class="row m-1"><h3>Alone</h3><p>Text.</p></div>
        </div></main></body></html>"#;
    let document = DocumentContext::new("x.html", Some("intro".into()));
    let converted = transpile(html, &document, &TranspileOptions::default()).unwrap();

    assert_eq!((converted.position, converted.depth), (1, 1));
    let warnings = converted
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    assert_eq!(warnings, 1);
    assert_eq!(converted.text, "# Alone\n\nText.\n");
}

#[test]
fn test_title_falls_back_to_document_title() {
    let html = r#"<html><head><title>Glossary</title></head><body>
        <div class="col-md-7 border rounded"><p>Terms.</p></div></body></html>"#;
    let document = DocumentContext::new("index.html", Some("glossary".into()));
    let converted = transpile(html, &document, &TranspileOptions::default()).unwrap();
    assert!(converted.text.starts_with("# Glossary\n\n"));
    assert!(converted.text.contains("Terms.\n"));
}
