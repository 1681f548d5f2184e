//! Output assembly
//!
//! Turns the line buffer a conversion builds into final text. The cleaning rules:
//!
//! - the first line is kept when it, or the line after it, is non-blank;
//! - later lines are kept when non-blank, or when blank right after a kept non-blank line;
//! - trailing blank lines are dropped.
//!
//! Blank lines come out empty, without spaces. Entries holding several lines are split first, so
//! assembling assembled text changes nothing.

/// Whether a line holds only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Apply the cleaning rules to a list of lines.
pub fn tidy<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let flat: Vec<&str> = lines
        .iter()
        .flat_map(|line| line.as_ref().split('\n'))
        .collect();

    let mut kept: Vec<String> = Vec::with_capacity(flat.len());
    for (index, line) in flat.iter().enumerate() {
        let blank = is_blank(line);
        let keep = if index == 0 {
            !blank || flat.get(1).is_some_and(|next| !is_blank(next))
        } else {
            !blank || kept.last().is_some_and(|previous| !is_blank(previous))
        };
        if keep {
            kept.push(if blank { String::new() } else { line.to_string() });
        }
    }

    while kept.last().is_some_and(|line| is_blank(line)) {
        kept.pop();
    }
    kept
}

/// Join cleaned lines into text ending in exactly one newline. Blank input yields `""`.
pub fn assemble<S: AsRef<str>>(lines: &[S]) -> String {
    let kept = tidy(lines);
    if kept.is_empty() {
        return String::new();
    }
    let mut text = kept.join("\n");
    text.push('\n');
    text
}
