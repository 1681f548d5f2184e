//! Shared helpers for the integration tests.

use isbdm_babel::RawNavEntry;
use std::path::PathBuf;

/// Contents of a file under `tests/fixtures/`.
pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Raw rows from `(key, indent)` pairs, positions in order.
pub fn raw_rows(rows: &[(&str, usize)]) -> Vec<RawNavEntry> {
    rows.iter()
        .enumerate()
        .map(|(index, (key, indent))| RawNavEntry {
            source_reference: format!("test.html#{}", index + 1),
            normalized_key: key.to_string(),
            label: key.to_string(),
            local_indent: *indent,
            position: index + 1,
            original_href: format!("{key}.html"),
        })
        .collect()
}

/// A sidebar page with one `div.d-flex` row per `(href, indent)` pair.
pub fn sidebar_page(rows: &[(&str, usize)]) -> String {
    let mut html = String::from(r#"<html><body><nav class="navISBDMSection">"#);
    for (href, indent) in rows {
        html.push_str(r#"<div class="d-flex">"#);
        for _ in 0..*indent {
            html.push_str(r#"<i class="bi bi-arrow-return-right"></i>"#);
        }
        html.push_str(&format!(r#"<a href="{href}">{href}</a></div>"#));
    }
    html.push_str("</nav></body></html>");
    html
}
