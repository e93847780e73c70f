//! Share-scoped document lookup with TTL
//!
//! A [`DocumentLookup`] indexes the documents of exactly one share slug at a
//! time. The owner creates it, calls [`DocumentLookup::init`] before
//! rendering, and calls [`DocumentLookup::clear`] when the consuming view
//! goes away.
//!
//! # Thread Safety
//!
//! The installed snapshot sits behind a `parking_lot::RwLock` so every read
//! accessor is synchronous. `init` is serialized by a `tokio::sync::Mutex`
//! and never holds the snapshot lock across the fetch.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use super::error::Result;
use super::source::DocumentSource;
use super::types::{
    DocumentInfo, InitOutcome, LookupStatus, NavigationTarget, SectionInfo,
};

/// Default freshness window of a loaded listing
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Strip the final extension: `"memo.v2.docx"` becomes `"memo.v2"`.
/// Dotfiles such as `".env"` are returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Indexed listing for one slug
struct Snapshot {
    slug: String,
    loaded_at: Instant,
    loaded_at_utc: DateTime<Utc>,
    documents: Vec<Arc<DocumentInfo>>,
    by_filename: HashMap<String, Arc<DocumentInfo>>,
    /// Extension-stripped filenames, consulted only after exact names
    by_stem: HashMap<String, Arc<DocumentInfo>>,
    by_id: HashMap<String, Arc<DocumentInfo>>,
    by_title: HashMap<String, Arc<DocumentInfo>>,
}

impl Snapshot {
    /// Index documents in listing order. Existing keys are never
    /// overwritten, so the first document claiming a name keeps it.
    fn build(slug: &str, listing: Vec<DocumentInfo>) -> Self {
        let documents: Vec<Arc<DocumentInfo>> = listing.into_iter().map(Arc::new).collect();

        let mut by_filename = HashMap::new();
        let mut by_stem = HashMap::new();
        let mut by_id = HashMap::new();
        let mut by_title = HashMap::new();

        for doc in &documents {
            let mut names = vec![normalize(&doc.filename)];
            if let Some(internal) = doc.internal_filename.as_deref() {
                names.push(normalize(internal));
            }

            for name in names.into_iter().filter(|n| !n.is_empty()) {
                by_stem
                    .entry(strip_extension(&name).to_string())
                    .or_insert_with(|| Arc::clone(doc));
                by_filename.entry(name).or_insert_with(|| Arc::clone(doc));
            }

            by_id
                .entry(doc.id.clone())
                .or_insert_with(|| Arc::clone(doc));

            if let Some(title) = doc.title.as_deref() {
                let title = normalize(title);
                if !title.is_empty() {
                    by_title.entry(title).or_insert_with(|| Arc::clone(doc));
                }
            }
        }

        Self {
            slug: slug.to_string(),
            loaded_at: Instant::now(),
            loaded_at_utc: Utc::now(),
            documents,
            by_filename,
            by_stem,
            by_id,
            by_title,
        }
    }

    fn is_fresh(&self, slug: &str, ttl: Duration) -> bool {
        self.slug == slug && self.loaded_at.elapsed() < ttl
    }

    /// Exact filename, then extension-stripped, then title
    fn find_by_filename(&self, filename: &str) -> Option<Arc<DocumentInfo>> {
        let key = normalize(filename);
        if key.is_empty() {
            return None;
        }
        let stripped = strip_extension(&key);

        self.by_filename
            .get(&key)
            .or_else(|| self.by_stem.get(&key))
            .or_else(|| self.by_filename.get(stripped))
            .or_else(|| self.by_stem.get(stripped))
            .or_else(|| self.by_title.get(&key))
            .or_else(|| self.by_title.get(stripped))
            .cloned()
    }
}

/// Document lookup for a single share slug
pub struct DocumentLookup {
    source: Arc<dyn DocumentSource>,
    ttl: Duration,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    init_lock: Mutex<()>,
}

impl DocumentLookup {
    /// Create an uninitialized lookup with the default TTL
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: Arc<dyn DocumentSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: RwLock::new(None),
            init_lock: Mutex::new(()),
        }
    }

    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().clone()
    }

    /// Load the listing for `slug` unless a fresh one is already installed
    ///
    /// On failure the previously installed snapshot (if any) is kept.
    pub async fn init(&self, slug: &str, force: bool) -> Result<InitOutcome> {
        if !force && self.is_initialized(slug) {
            return Ok(InitOutcome::Cached);
        }

        let _guard = self.init_lock.lock().await;

        // Another caller may have loaded while we waited
        if !force && self.is_initialized(slug) {
            return Ok(InitOutcome::Cached);
        }

        let listing = match self.source.fetch_documents(slug).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!("Failed to load documents for share {}: {}", slug, e);
                return Err(e);
            }
        };

        let snapshot = Snapshot::build(slug, listing);
        let documents = snapshot.documents.len();
        *self.snapshot.write() = Some(Arc::new(snapshot));

        tracing::info!("Loaded {} documents for share {}", documents, slug);
        Ok(InitOutcome::Loaded { documents })
    }

    /// Whether a fresh listing for `slug` is installed. Never fetches.
    pub fn is_initialized(&self, slug: &str) -> bool {
        self.current()
            .map(|s| s.is_fresh(slug, self.ttl))
            .unwrap_or(false)
    }

    /// Drop the installed listing
    pub fn clear(&self) {
        if let Some(previous) = self.snapshot.write().take() {
            tracing::debug!("Cleared document lookup for share {}", previous.slug);
        }
    }

    /// Resolve a citation filename (display name, storage name, or title)
    pub fn lookup_by_filename(&self, filename: &str) -> Option<Arc<DocumentInfo>> {
        match self.current() {
            Some(snapshot) => snapshot.find_by_filename(filename),
            None => {
                tracing::warn!("Document lookup not initialized, cannot resolve {}", filename);
                None
            }
        }
    }

    pub fn lookup_by_id(&self, document_id: &str) -> Option<Arc<DocumentInfo>> {
        self.current()?.by_id.get(document_id).cloned()
    }

    /// All documents in listing order
    pub fn all_documents(&self) -> Vec<Arc<DocumentInfo>> {
        self.current()
            .map(|s| s.documents.clone())
            .unwrap_or_default()
    }

    pub fn verify_section_exists(&self, document_id: &str, section_id: &str) -> bool {
        self.lookup_by_id(document_id)
            .map(|doc| doc.section(section_id).is_some())
            .unwrap_or(false)
    }

    /// Display filename of the cited document, or the citation text itself
    pub fn display_name(&self, filename: &str) -> String {
        self.lookup_by_filename(filename)
            .map(|doc| doc.filename.clone())
            .unwrap_or_else(|| filename.to_string())
    }

    /// Document and section titles, when both resolve
    pub fn section_info(&self, filename: &str, section_id: &str) -> Option<SectionInfo> {
        let doc = self.lookup_by_filename(filename)?;
        let section = doc.section(section_id)?;
        Some(SectionInfo {
            document_title: doc.display_title().to_string(),
            section_title: section.title.clone(),
        })
    }

    /// Navigation target for a citation, if its document resolves
    pub fn navigation_target(&self, filename: &str, section_id: &str) -> Option<NavigationTarget> {
        let doc = self.lookup_by_filename(filename)?;
        Some(NavigationTarget {
            document_id: doc.id.clone(),
            filename: doc.filename.clone(),
            section_id: section_id.to_string(),
            section_found: doc.section(section_id).is_some(),
        })
    }

    pub fn status(&self) -> LookupStatus {
        match self.current() {
            Some(snapshot) => LookupStatus {
                fresh: snapshot.loaded_at.elapsed() < self.ttl,
                slug: Some(snapshot.slug.clone()),
                document_count: snapshot.documents.len(),
                loaded_at: Some(snapshot.loaded_at_utc),
            },
            None => LookupStatus {
                slug: None,
                document_count: 0,
                loaded_at: None,
                fresh: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::error::LookupError;
    use crate::lookup::types::{DocumentStatus, OutlineSection};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingSource {
        documents: Vec<DocumentInfo>,
        fetches: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingSource {
        fn new(documents: Vec<DocumentInfo>) -> Arc<Self> {
            Arc::new(Self {
                documents,
                fetches: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            })
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentSource for CountingSource {
        async fn fetch_documents(&self, slug: &str) -> Result<Vec<DocumentInfo>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(LookupError::Backend {
                    slug: slug.to_string(),
                    status: 503,
                });
            }
            Ok(self.documents.clone())
        }
    }

    fn doc(id: &str, filename: &str, internal: Option<&str>, title: Option<&str>) -> DocumentInfo {
        DocumentInfo {
            id: id.to_string(),
            filename: filename.to_string(),
            internal_filename: internal.map(str::to_string),
            title: title.map(str::to_string),
            mime_type: "application/pdf".to_string(),
            outline: vec![
                OutlineSection {
                    id: format!("{}-intro", id),
                    title: "Introduction".to_string(),
                    level: 1,
                    position: 0,
                },
                OutlineSection {
                    id: "section-3".to_string(),
                    title: "Results".to_string(),
                    level: 2,
                    position: 3,
                },
            ],
            status: DocumentStatus::Ready,
        }
    }

    fn fixture() -> Vec<DocumentInfo> {
        vec![
            doc(
                "memo",
                "Board_Memo.docx",
                Some("1766337527304_abc.docx"),
                Some("Q3 Board Memo"),
            ),
            doc("report", "report.pdf", None, Some("Annual Report")),
            doc("report-draft", "report.docx", None, None),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_uninitialized_lookup_returns_nothing() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));

        assert!(!lookup.is_initialized("share"));
        assert!(lookup.lookup_by_filename("report.pdf").is_none());
        assert!(lookup.lookup_by_id("report").is_none());
        assert!(lookup.all_documents().is_empty());
        assert_eq!(lookup.display_name("report.pdf"), "report.pdf");
        assert!(lookup.status().slug.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_twice_fetches_once() {
        let source = CountingSource::new(fixture());
        let lookup = DocumentLookup::new(source.clone());

        let first = lookup.init("share", false).await.unwrap();
        let second = lookup.init("share", false).await.unwrap();

        assert_eq!(first, InitOutcome::Loaded { documents: 3 });
        assert_eq!(second, InitOutcome::Cached);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_init_fetches_once() {
        let source = CountingSource::new(fixture());
        let lookup = DocumentLookup::new(source.clone());

        let (a, b) = tokio::join!(lookup.init("share", false), lookup.init("share", false));
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_force_and_slug_change_refetch() {
        let source = CountingSource::new(fixture());
        let lookup = DocumentLookup::new(source.clone());

        lookup.init("share", false).await.unwrap();
        lookup.init("share", true).await.unwrap();
        assert_eq!(source.fetches(), 2);

        assert!(!lookup.is_initialized("other"));
        lookup.init("other", false).await.unwrap();
        assert_eq!(source.fetches(), 3);
        assert!(lookup.is_initialized("other"));
        assert!(!lookup.is_initialized("share"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let source = CountingSource::new(fixture());
        let lookup = DocumentLookup::new(source.clone());

        lookup.init("share", false).await.unwrap();
        assert!(lookup.is_initialized("share"));

        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        assert!(lookup.is_initialized("share"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(!lookup.is_initialized("share"));
        // Stale data keeps answering until refreshed
        assert!(lookup.lookup_by_filename("report.pdf").is_some());
        assert!(!lookup.status().fresh);

        lookup.init("share", false).await.unwrap();
        assert_eq!(source.fetches(), 2);
        assert!(lookup.is_initialized("share"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_case_insensitive_lookup() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));
        lookup.init("share", false).await.unwrap();

        let upper = lookup.lookup_by_filename("Board_Memo.DOCX").unwrap();
        let lower = lookup.lookup_by_filename("board_memo.docx").unwrap();
        assert_eq!(upper.id, lower.id);
        assert_eq!(upper.id, "memo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_internal_and_display_resolve_to_same_document() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));
        lookup.init("share", false).await.unwrap();

        let display = lookup.lookup_by_filename("Board_Memo.docx").unwrap();
        let internal = lookup.lookup_by_filename("1766337527304_abc.docx").unwrap();
        assert!(Arc::ptr_eq(&display, &internal));

        let internal_stem = lookup.lookup_by_filename("1766337527304_abc").unwrap();
        assert_eq!(internal_stem.id, "memo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stripped_and_title_fallbacks() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));
        lookup.init("share", false).await.unwrap();

        // "report" is claimed by report.pdf, listed before report.docx
        assert_eq!(lookup.lookup_by_filename("report").unwrap().id, "report");
        assert_eq!(lookup.lookup_by_filename("report.docx").unwrap().id, "report-draft");
        // Wrong extension falls back to the stripped name
        assert_eq!(lookup.lookup_by_filename("report.txt").unwrap().id, "report");
        assert_eq!(lookup.lookup_by_filename("annual report").unwrap().id, "report");
        assert_eq!(lookup.lookup_by_filename("Q3 Board Memo").unwrap().id, "memo");
        assert!(lookup.lookup_by_filename("nothing.pdf").is_none());
        assert!(lookup.lookup_by_filename("   ").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exact_name_beats_earlier_stem() {
        let lookup = DocumentLookup::new(CountingSource::new(vec![
            doc("pdf", "report.pdf", None, None),
            doc("plain", "report", None, None),
            doc("memo", "memo.docx", Some("report.txt"), None),
        ]));
        lookup.init("share", false).await.unwrap();

        assert_eq!(lookup.lookup_by_filename("report").unwrap().id, "plain");
        assert_eq!(lookup.lookup_by_filename("REPORT.PDF").unwrap().id, "pdf");
        // Internal names are exact keys too
        assert_eq!(lookup.lookup_by_filename("report.txt").unwrap().id, "memo");
        // Unknown extension falls back to the exact stem before other stems
        assert_eq!(lookup.lookup_by_filename("report.md").unwrap().id, "plain");
    }

    #[tokio::test(start_paused = true)]
    async fn test_section_accessors() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));
        lookup.init("share", false).await.unwrap();

        let info = lookup.section_info("report.pdf", "section-3").unwrap();
        assert_eq!(info.document_title, "Annual Report");
        assert_eq!(info.section_title, "Results");

        assert!(lookup.section_info("report.pdf", "section-99").is_none());
        assert!(lookup.section_info("missing.pdf", "section-3").is_none());

        // Untitled documents fall back to the display filename
        let untitled = lookup.section_info("report.docx", "section-3").unwrap();
        assert_eq!(untitled.document_title, "report.docx");

        assert!(lookup.verify_section_exists("memo", "memo-intro"));
        assert!(!lookup.verify_section_exists("memo", "report-intro"));
        assert!(!lookup.verify_section_exists("nope", "memo-intro"));

        assert_eq!(lookup.display_name("1766337527304_abc.docx"), "Board_Memo.docx");
        assert_eq!(lookup.display_name("unknown.pdf"), "unknown.pdf");

        let target = lookup.navigation_target("report.pdf", "section-99").unwrap();
        assert_eq!(target.document_id, "report");
        assert!(!target.section_found);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_init_keeps_previous_snapshot() {
        let source = CountingSource::new(fixture());
        let lookup = DocumentLookup::new(source.clone());

        source.fail.store(true, Ordering::SeqCst);
        assert!(lookup.init("share", false).await.is_err());
        assert!(lookup.status().slug.is_none());

        source.fail.store(false, Ordering::SeqCst);
        lookup.init("share", false).await.unwrap();

        source.fail.store(true, Ordering::SeqCst);
        assert!(lookup.init("share", true).await.is_err());
        assert_eq!(lookup.all_documents().len(), 3);
        assert!(lookup.is_initialized("share"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let lookup = DocumentLookup::new(CountingSource::new(fixture()));
        lookup.init("share", false).await.unwrap();
        lookup.clear();

        assert!(!lookup.is_initialized("share"));
        assert!(lookup.lookup_by_filename("report.pdf").is_none());
        assert_eq!(lookup.status().document_count, 0);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("report.pdf"), "report");
        assert_eq!(strip_extension("memo.v2.docx"), "memo.v2");
        assert_eq!(strip_extension("README"), "README");
        assert_eq!(strip_extension(".env"), ".env");
    }
}
