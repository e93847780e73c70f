//! Document listing types
//!
//! Wire shapes of the backend's "documents for share slug" listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of a shared document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    #[default]
    Ready,
    Failed,
    #[serde(other)]
    Unknown,
}

/// One section of a document outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineSection {
    /// Section id, as used in citation markers
    pub id: String,
    /// Section heading
    pub title: String,
    /// Heading depth (1 = top level)
    #[serde(default)]
    pub level: u32,
    /// Ordinal position within the document
    #[serde(default)]
    pub position: u64,
}

/// A document available under a share link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub id: String,
    /// Display filename as uploaded
    pub filename: String,
    /// Storage-level filename, which is what citations usually carry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_filename: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub outline: Vec<OutlineSection>,
    #[serde(default)]
    pub status: DocumentStatus,
}

impl DocumentInfo {
    /// Find a section of this document's outline
    pub fn section(&self, section_id: &str) -> Option<&OutlineSection> {
        self.outline.iter().find(|s| s.id == section_id)
    }

    /// Title if present and non-empty, otherwise the display filename
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.filename,
        }
    }
}

/// Resolved titles for a cited section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionInfo {
    pub document_title: String,
    pub section_title: String,
}

/// Where a citation click should take the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    pub document_id: String,
    pub filename: String,
    pub section_id: String,
    /// False when the document resolved but the section is not in its outline
    pub section_found: bool,
}

/// Snapshot of a lookup's freshness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupStatus {
    pub slug: Option<String>,
    pub document_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub fresh: bool,
}

/// Result of an `init` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The installed snapshot was fresh; nothing was fetched
    Cached,
    /// A listing was fetched and installed
    Loaded { documents: usize },
}
