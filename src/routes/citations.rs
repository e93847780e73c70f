//! Stateless citation endpoints
//!
//! - `POST /parse`: markers found in a message
//! - `POST /split`: message split into prose and citation parts
//! - `POST /number`: markers rewritten as numbered `cite://` links

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::citation::{has_references, number_citations, parse_references, DocumentReference, NumberedMessage};
use crate::render::{split_message_into_parts, MessagePart};
use crate::state::AppState;

/// Request body shared by all citation endpoints
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub has_references: bool,
    pub references: Vec<DocumentReference>,
}

#[derive(Serialize)]
pub struct SplitResponse {
    pub parts: Vec<MessagePart>,
}

async fn parse(Json(req): Json<MessageRequest>) -> Json<ParseResponse> {
    Json(ParseResponse {
        has_references: has_references(&req.content),
        references: parse_references(&req.content),
    })
}

async fn split(Json(req): Json<MessageRequest>) -> Json<SplitResponse> {
    Json(SplitResponse {
        parts: split_message_into_parts(&req.content),
    })
}

async fn number(Json(req): Json<MessageRequest>) -> Json<NumberedMessage> {
    Json(number_citations(&req.content))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse))
        .route("/split", post(split))
        .route("/number", post(number))
}
