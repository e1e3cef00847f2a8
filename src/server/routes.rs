//! HTTP route handlers for the document store API.

use crate::document::DocumentFile;
use crate::error::{ErrorKind, StoreError};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct UploadFile {
    pub name: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
}

#[derive(Serialize, Deserialize)]
pub struct UploadResponse {
    pub added: usize,
    pub total: usize,
    pub message: String,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct QueryResponse {
    pub id: String,
    pub header: String,
    pub body: String,
    pub filename: String,
    pub distance: f32,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub count: usize,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub available: bool,
    pub document_count: usize,
    pub metric: Option<String>,
    pub dimension: Option<usize>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: StoreError) -> ApiError {
    let kind = e.kind();
    let status = match kind {
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::EmptyCollection | ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Io => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Embedding | ErrorKind::Index => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            kind,
            error: e.to_string(),
        }),
    )
}

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents", post(add_documents).delete(delete_all))
        .route("/query", post(query))
        .route("/count", get(count))
        .route("/health", get(health))
        .with_state(state)
}

// --- Handlers ---

async fn add_documents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let files: Vec<DocumentFile> = req
        .files
        .into_iter()
        .map(|f| DocumentFile::new(f.name, f.content))
        .collect();

    let report = state.store.add_documents(&files).map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            added: report.added,
            total: report.total,
            message: report.to_string(),
        }),
    ))
}

async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let hit = state.store.query(&req.text).map_err(error_response)?;

    Ok(Json(QueryResponse {
        id: hit.id.to_string(),
        header: hit.header(),
        body: hit.body,
        filename: hit.filename,
        distance: hit.distance,
    }))
}

async fn delete_all(State(state): State<Arc<AppState>>) -> Result<Json<DeleteResponse>, ApiError> {
    let report = state.store.delete_all().map_err(error_response)?;

    Ok(Json(DeleteResponse {
        count: report.count,
        message: report.to_string(),
    }))
}

async fn count(State(state): State<Arc<AppState>>) -> Result<Json<CountResponse>, ApiError> {
    let count = state.store.count().map_err(error_response)?;
    Ok(Json(CountResponse { count }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let available = state.store.is_available();
    let document_count = state.store.count().unwrap_or(0);
    let metric = state.store.metric().ok().map(|m| m.to_string());
    let dimension = state.store.dimension().ok().flatten();

    Json(HealthResponse {
        status: if available { "ok" } else { "degraded" }.to_string(),
        available,
        document_count,
        metric,
        dimension,
    })
}
