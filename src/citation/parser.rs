//! Citation marker parser

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::DocumentReference;

/// Literal prefix every marker starts with
pub const MARKER_PREFIX: &str = "[DOC:";

/// Marker pattern. The filename class excludes `:` so the split between
/// filename and section id is unambiguous.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[DOC:([a-zA-Z0-9\s._-]+):([a-zA-Z0-9_-]+)\]")
        .expect("citation marker pattern is valid")
});

/// Find all citation markers in `text`, in order of appearance
pub fn parse_references(text: &str) -> Vec<DocumentReference> {
    if !text.contains(MARKER_PREFIX) {
        return Vec::new();
    }

    MARKER_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let filename = cap.get(1)?;
            let section = cap.get(2)?;
            Some(DocumentReference {
                filename: filename.as_str().to_string(),
                section_id: section.as_str().to_string(),
                start_index: whole.start(),
                end_index: whole.end(),
                raw: whole.as_str().to_string(),
            })
        })
        .collect()
}

/// Whether `text` contains at least one well-formed marker
pub fn has_references(text: &str) -> bool {
    text.contains(MARKER_PREFIX) && MARKER_RE.is_match(text)
}
