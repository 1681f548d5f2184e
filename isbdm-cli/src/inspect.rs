//! Views of one reconstructed sidebar section
//!
//! `isbdm inspect-sidebar <section>` prints the section the way the sidebar front matter will see
//! it. Two views are available:
//!
//! - `tree`: one line per entry, the box-drawing prefix followed by the label, the key and the
//!   entry's depth and position.
//! - `json`: the full entries, flags included, as pretty-printed JSON.

use isbdm_babel::NavEntry;

/// All available section views.
pub const AVAILABLE_VIEWS: &[&str] = &["tree", "json"];

/// Render `entries` with the named view.
pub fn render_section(entries: &[NavEntry], view: &str) -> Result<String, String> {
    match view {
        "tree" => Ok(render_tree(entries)),
        "json" => serde_json::to_string_pretty(entries)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn render_tree(entries: &[NavEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        let prefix = entry.prefix().unwrap_or_default();
        output.push_str(&format!(
            "{prefix}{}  [{}] depth {} position {}\n",
            entry.label, entry.normalized_key, entry.absolute_depth, entry.position
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use isbdm_babel::{reconstruct, RawNavEntry};

    fn section() -> Vec<NavEntry> {
        let raw = [("intro/index", 0), ("intro/i001", 1), ("intro/i002", 1)]
            .iter()
            .enumerate()
            .map(|(index, (key, indent))| RawNavEntry {
                source_reference: format!("intro/index.html#{}", index + 1),
                normalized_key: key.to_string(),
                label: key.rsplit('/').next().unwrap_or_default().to_string(),
                local_indent: *indent,
                position: index + 1,
                original_href: String::new(),
            })
            .collect();
        reconstruct(raw, 1).unwrap()
    }

    #[test]
    fn tree_view_draws_prefixes() {
        let output = render_section(&section(), "tree").unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "index  [intro/index] depth 1 position 1");
        assert_eq!(lines[1], "├─ i001  [intro/i001] depth 2 position 2");
        assert_eq!(lines[2], "└─ i002  [intro/i002] depth 2 position 3");
    }

    #[test]
    fn json_view_carries_flags() {
        let output = render_section(&section(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["is_last_sibling"], false);
        assert_eq!(value[2]["ancestor_is_last"], serde_json::json!([true]));
        assert_eq!(value[0]["has_children"], true);
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(render_section(&[], "graph").is_err());
    }
}
