//! Leading YAML front matter of MDX documents.
//!
//! A front-matter block opens with a `---` line at the very start of the document and closes with
//! the next `---` line. Key order survives a [`split`] / [`render`] round trip.

use crate::error::BabelError;
use serde_yaml::{Mapping, Value};

/// Separate the front matter from the body.
///
/// Documents without a block yield an empty map and the whole content as body. A block that is
/// not valid YAML is logged and treated the same way.
pub fn split(content: &str) -> (Mapping, String) {
    let Some((yaml, body)) = locate(content) else {
        return (Mapping::new(), content.to_string());
    };
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(mapping)) => (mapping, body.to_string()),
        Ok(_) => (Mapping::new(), body.to_string()),
        Err(e) => {
            tracing::error!("Invalid front matter: {}", e);
            (Mapping::new(), content.to_string())
        }
    }
}

/// Serialize front matter and body back into a document.
///
/// An empty map produces the body alone, with leading whitespace trimmed.
pub fn render(front_matter: &Mapping, body: &str) -> Result<String, BabelError> {
    if front_matter.is_empty() {
        return Ok(body.trim_start().to_string());
    }
    let yaml = serde_yaml::to_string(front_matter)?;
    Ok(format!("---\n{yaml}---\n{body}"))
}

fn locate(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        return None;
    }
    let yaml_start = 3 + newline + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if let Some(tail) = line.strip_prefix("---") {
            if tail.trim().is_empty() {
                return Some((&content[yaml_start..offset], &content[offset + line.len()..]));
            }
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_and_render_keep_order() {
        let doc = "---\nzeta: 1\nalpha: two\n---\n# Title\n\nBody\n";
        let (fm, body) = split(doc);
        let keys: Vec<&str> = fm.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(body, "# Title\n\nBody\n");
        assert_eq!(render(&fm, &body).unwrap(), doc);
    }

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = split("# Only body\n");
        assert!(fm.is_empty());
        assert_eq!(body, "# Only body\n");
    }

    #[test]
    fn test_invalid_yaml_keeps_content() {
        let doc = "---\nkey: [unclosed\n---\nbody\n";
        let (fm, body) = split(doc);
        assert!(fm.is_empty());
        assert_eq!(body, doc);
    }

    #[test]
    fn test_render_empty_map_trims_body() {
        assert_eq!(render(&Mapping::new(), "\n\n# T\n").unwrap(), "# T\n");
    }
}
