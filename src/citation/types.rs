//! Citation types

use serde::{Deserialize, Serialize};

/// A single citation marker found in message text
///
/// Offsets are byte offsets into the source string, so
/// `&source[start_index..end_index] == raw` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    /// Display or internal (storage) filename
    pub filename: String,
    /// Section id within the document outline
    pub section_id: String,
    /// Byte offset of the opening `[`
    pub start_index: usize,
    /// Byte offset one past the closing `]`
    pub end_index: usize,
    /// The full matched marker text
    pub raw: String,
}

impl DocumentReference {
    /// Key identifying the cited target, used for deduplication
    pub fn target(&self) -> (&str, &str) {
        (&self.filename, &self.section_id)
    }
}
