//! Shared test fixtures for lookup consumers

use std::sync::Arc;

use async_trait::async_trait;

use super::cache::DocumentLookup;
use super::error::Result;
use super::source::DocumentSource;
use super::types::{DocumentInfo, DocumentStatus, OutlineSection};

/// Source returning a fixed listing for every slug
pub(crate) struct StaticSource(pub Vec<DocumentInfo>);

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch_documents(&self, _slug: &str) -> Result<Vec<DocumentInfo>> {
        Ok(self.0.clone())
    }
}

fn section(id: &str, title: &str, level: u32, position: u64) -> OutlineSection {
    OutlineSection {
        id: id.to_string(),
        title: title.to_string(),
        level,
        position,
    }
}

/// Two documents: a titled PDF report and a memo with a storage filename
pub(crate) fn sample_documents() -> Vec<DocumentInfo> {
    vec![
        DocumentInfo {
            id: "doc-report".to_string(),
            filename: "report.pdf".to_string(),
            internal_filename: None,
            title: Some("Annual Report".to_string()),
            mime_type: "application/pdf".to_string(),
            outline: vec![
                section("section-1", "Overview", 1, 0),
                section("section-3", "Results", 1, 2),
            ],
            status: DocumentStatus::Ready,
        },
        DocumentInfo {
            id: "doc-memo".to_string(),
            filename: "Board_Memo.docx".to_string(),
            internal_filename: Some("1766337527304_abc.docx".to_string()),
            title: Some("Board Memo".to_string()),
            mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                .to_string(),
            outline: vec![section("memo-intro", "Purpose & Scope", 1, 0)],
            status: DocumentStatus::Ready,
        },
    ]
}

pub(crate) fn sample_source() -> Arc<dyn DocumentSource> {
    Arc::new(StaticSource(sample_documents()))
}

/// Lookup already initialized for slug `"share"`
pub(crate) async fn sample_lookup() -> DocumentLookup {
    let lookup = DocumentLookup::new(sample_source());
    lookup
        .init("share", false)
        .await
        .expect("static source never fails");
    lookup
}
