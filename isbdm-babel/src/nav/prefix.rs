//! Box-drawing sidebar prefixes
//!
//! A prefix is a row of three-column filler cells followed by the entry's own connector.
//! Top-level entries carry no prefix, and second-level entries carry only the connector.

const OPEN_CELL: &str = "   ";
const BAR_CELL: &str = "│  ";
const TEE: &str = "├─ ";
const CORNER: &str = "└─ ";

/// Render the prefix for an entry at `depth`.
///
/// One filler cell is drawn per ancestor level `0..depth - 2`: open when that ancestor was the
/// last of its siblings, a vertical bar otherwise. A missing ancestor flag is drawn open.
pub fn render_prefix(depth: usize, is_last: bool, ancestor_is_last: &[bool]) -> Option<String> {
    if depth < 2 {
        return None;
    }
    let mut prefix = String::new();
    for index in 0..depth - 2 {
        let ancestor_last = ancestor_is_last.get(index).copied().unwrap_or(true);
        prefix.push_str(if ancestor_last { OPEN_CELL } else { BAR_CELL });
    }
    prefix.push_str(if is_last { CORNER } else { TEE });
    Some(prefix)
}
