//! Share-scoped document endpoints
//!
//! Every route is keyed by the share slug. The slug's lookup is loaded on
//! demand through the registry, so the first request for a share pays for
//! the backend listing and later ones are served from the snapshot until it
//! goes stale.
//!
//! - `POST /:slug/render`: render a message with resolved citations
//! - `GET /:slug/documents`: all documents (`?force=true` refetches)
//! - `GET /:slug/documents/lookup?filename=`: resolve a cited filename
//! - `GET /:slug/documents/:id`: document by id
//! - `GET /:slug/sections?filename=&sectionId=`: document and section titles
//! - `POST /:slug/navigate`: where a citation click leads
//! - `GET /:slug/status`: snapshot freshness
//! - `DELETE /:slug`: drop the share's lookup

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::lookup::{DocumentInfo, LookupStatus, NavigationTarget, SectionInfo};
use crate::render::{handle_citation_click, CitationMode, MessageRenderer, RenderedMessage};
use crate::state::AppState;

/// Upper bound on message size accepted for rendering
const MAX_CONTENT_LENGTH: usize = 256 * 1024;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub content: String,
    pub mode: Option<CitationMode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Deserialize)]
pub struct FilenameQuery {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionQuery {
    pub filename: String,
    pub section_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentInfo>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ReleaseResponse {
    pub released: bool,
}

async fn render_message(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderedMessage>> {
    if req.content.len() > MAX_CONTENT_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Message exceeds {} bytes",
            MAX_CONTENT_LENGTH
        )));
    }

    let lookup = state.lookups().initialized(&slug, false).await?;
    let mode = req.mode.unwrap_or(state.config().viewer.citation_mode);
    let rendered = MessageRenderer::new(&lookup, mode).render(&req.content);

    tracing::debug!(
        "Rendered message for share {} with {} citations",
        slug,
        rendered.citations.len()
    );
    Ok(Json(rendered))
}

async fn list_documents(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DocumentListResponse>> {
    let lookup = state.lookups().initialized(&slug, query.force).await?;
    let documents: Vec<DocumentInfo> = lookup
        .all_documents()
        .iter()
        .map(|doc| doc.as_ref().clone())
        .collect();

    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}

async fn lookup_document(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<FilenameQuery>,
) -> Result<Json<DocumentInfo>> {
    let lookup = state.lookups().initialized(&slug, false).await?;
    lookup
        .lookup_by_filename(&query.filename)
        .map(|doc| Json(doc.as_ref().clone()))
        .ok_or_else(|| AppError::NotFound(format!("No document matches {}", query.filename)))
}

async fn get_document(
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<DocumentInfo>> {
    let lookup = state.lookups().initialized(&slug, false).await?;
    lookup
        .lookup_by_id(&id)
        .map(|doc| Json(doc.as_ref().clone()))
        .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", id)))
}

async fn section_info(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SectionQuery>,
) -> Result<Json<SectionInfo>> {
    let lookup = state.lookups().initialized(&slug, false).await?;
    lookup
        .section_info(&query.filename, &query.section_id)
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Section {} not found in {}",
                query.section_id, query.filename
            ))
        })
}

async fn navigate(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<SectionQuery>,
) -> Result<Json<NavigationTarget>> {
    let lookup = state.lookups().initialized(&slug, false).await?;
    let mut log_navigation = |filename: &str, section_id: &str| {
        tracing::debug!("Citation in share {} opens {} at {}", slug, filename, section_id);
    };

    handle_citation_click(&lookup, &mut log_navigation, &req.filename, &req.section_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No document matches {}", req.filename)))
}

async fn status(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LookupStatus>> {
    let lookup = state.lookups().lookup(&slug)?;
    Ok(Json(lookup.status()))
}

async fn release(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Json<ReleaseResponse> {
    let released = state.lookups().release(&slug);
    if released {
        tracing::info!("Released document lookup for share {}", slug);
    }
    Json(ReleaseResponse { released })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:slug", delete(release))
        .route("/:slug/render", post(render_message))
        .route("/:slug/documents", get(list_documents))
        .route("/:slug/documents/lookup", get(lookup_document))
        .route("/:slug/documents/:id", get(get_document))
        .route("/:slug/sections", get(section_info))
        .route("/:slug/navigate", post(navigate))
        .route("/:slug/status", get(status))
}
