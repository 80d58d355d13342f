use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use pulse_core::{NewsRecord, DEFAULT_TOPIC, RECENT_LIMIT};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewsResponse {
    success: bool,
    articles: Vec<NewsRecord>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct TopicsResponse {
    success: bool,
    topics: Vec<String>,
}

fn store_failure(e: pulse_core::Error) -> Response {
    error!(error = %e, "Store query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": e.to_string() })),
    )
        .into_response()
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /get_news?topic=... - newest records for a topic
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NewsQuery>,
) -> Response {
    let topic = params.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());

    match state.store.recent_by_topic(&topic, RECENT_LIMIT).await {
        Ok(articles) => Json(NewsResponse {
            success: true,
            count: articles.len(),
            articles,
        })
        .into_response(),
        Err(e) => store_failure(e),
    }
}

pub async fn get_topics(State(state): State<Arc<AppState>>) -> Response {
    match state.store.topics().await {
        Ok(topics) => Json(TopicsResponse {
            success: true,
            topics,
        })
        .into_response(),
        Err(e) => store_failure(e),
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "database": "connected",
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
