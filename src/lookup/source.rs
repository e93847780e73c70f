//! Document listing sources
//!
//! The lookup cache never talks to the network itself; it asks a
//! [`DocumentSource`] for the documents of a share slug.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::{LookupError, Result};
use super::types::DocumentInfo;

/// Provider of the document listing for a share slug
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch every document exposed under `slug`, in listing order
    async fn fetch_documents(&self, slug: &str) -> Result<Vec<DocumentInfo>>;
}

/// Reject slugs that cannot be used as a single path segment
pub fn validate_slug(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && slug.len() <= 128
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(LookupError::InvalidSlug(slug.to_string()))
    }
}

/// Listing body, either a bare array or wrapped in `{ "documents": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody {
    Bare(Vec<DocumentInfo>),
    Wrapped { documents: Vec<DocumentInfo> },
}

impl ListingBody {
    fn into_documents(self) -> Vec<DocumentInfo> {
        match self {
            ListingBody::Bare(docs) => docs,
            ListingBody::Wrapped { documents } => documents,
        }
    }
}

/// Backend API client for share listings
///
/// Issues `GET {base_url}/api/share/{slug}/documents`.
#[derive(Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn listing_url(&self, slug: &str) -> String {
        format!(
            "{}/api/share/{}/documents",
            self.base_url,
            urlencoding::encode(slug)
        )
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn fetch_documents(&self, slug: &str) -> Result<Vec<DocumentInfo>> {
        validate_slug(slug)?;

        let url = self.listing_url(slug);
        tracing::debug!("Fetching document listing from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Backend {
                slug: slug.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let listing: ListingBody =
            serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        Ok(listing.into_documents())
    }
}
