//! Viewer geometry endpoints
//!
//! Clients that cannot run the highlight coordinator locally post their
//! container and element metrics and replay the returned plan.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::highlight::{plan_scroll, ElementBox, ScrollContainer, ScrollPlan, HIGHLIGHT_CLASS};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrollPlanRequest {
    pub container: ScrollContainer,
    pub element: ElementBox,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPlanResponse {
    pub highlight_class: &'static str,
    #[serde(flatten)]
    pub plan: ScrollPlan,
}

async fn scroll_plan(
    State(state): State<AppState>,
    Json(req): Json<ScrollPlanRequest>,
) -> Result<Json<ScrollPlanResponse>> {
    let metrics = [
        req.container.scroll_top,
        req.container.client_height,
        req.container.scroll_height,
        req.element.top,
        req.element.height,
    ];
    if metrics.iter().any(|v| !v.is_finite()) {
        return Err(AppError::BadRequest("Metrics must be finite numbers".to_string()));
    }
    if req.container.client_height < 0.0 || req.element.height < 0.0 {
        return Err(AppError::BadRequest("Heights must not be negative".to_string()));
    }

    let timings = state.config().highlight_timings();
    Ok(Json(ScrollPlanResponse {
        highlight_class: HIGHLIGHT_CLASS,
        plan: plan_scroll(&req.container, &req.element, &timings),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/scroll-plan", post(scroll_plan))
}
