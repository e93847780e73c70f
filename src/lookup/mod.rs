//! Document lookup for shared conversations
//!
//! Resolves the filenames carried by citation markers to the documents
//! exposed under a share link.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               LookupRegistry                 │
//! │     (one DocumentLookup per slug, LRU)       │
//! └──────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │               DocumentLookup                 │
//! │  by_filename / by_id / by_title, TTL window  │
//! └──────────────────────────────────────────────┘
//!                       │ init()
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │          dyn DocumentSource                  │
//! │   (HttpDocumentSource -> backend listing)    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use citeline_server::lookup::{DocumentLookup, HttpDocumentSource};
//!
//! let source = HttpDocumentSource::new("http://localhost:8000", Duration::from_secs(10))?;
//! let lookup = DocumentLookup::new(Arc::new(source));
//!
//! lookup.init("team-share", false).await?;
//! let info = lookup.section_info("report.pdf", "section-3");
//! ```

mod cache;
mod error;
mod registry;
mod source;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cache::{strip_extension, DocumentLookup, DEFAULT_TTL};
pub use error::{LookupError, Result};
pub use registry::{LookupRegistry, RegistryConfig};
pub use source::{validate_slug, DocumentSource, HttpDocumentSource};
pub use types::{
    DocumentInfo, DocumentStatus, InitOutcome, LookupStatus, NavigationTarget, OutlineSection,
    SectionInfo,
};
