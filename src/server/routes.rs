//! HTTP handlers for the API surface

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::staging::StagedUploads;
use crate::server::state::AppState;
use crate::types::{FileFormat, SourceChunk};

/// Request body for `POST /query`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Response body for `POST /query`
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
    pub error: bool,
}

/// Response body for `POST /upload`
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub total_chunks: usize,
    pub files_processed: usize,
}

/// Response body for `GET /stats`
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_chunks: usize,
    pub collection_name: String,
    pub ollama_model: String,
    pub embedding_model: String,
}

/// Response body for `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama_connected: bool,
    pub index_loaded: bool,
}

/// Response body for `DELETE /clear`
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

/// GET / - service summary
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Document Q&A API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
        "endpoints": {
            "POST /upload": "Upload and process documents",
            "POST /query": "Ask a question about the uploaded documents",
            "GET /stats": "Index statistics",
            "DELETE /clear": "Delete all indexed documents",
            "GET /config": "Current configuration",
        }
    }))
}

/// GET /health - liveness plus model reachability and index state
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ollama_connected = state.engine().service_available().await;
    let index_loaded = state.engine().is_ready();

    Json(HealthResponse {
        status: if ollama_connected { "healthy" } else { "degraded" }.to_string(),
        ollama_connected,
        index_loaded,
    })
}

/// POST /upload - stage uploaded files, chunk them, and extend the index
///
/// Validation happens before any chunk reaches the index: an empty
/// upload or an unsupported extension rejects the whole batch with 400.
/// Staged temp files are removed on every exit path.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut staged = StagedUploads::new()?;
    let mut files = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::empty_input(format!("malformed upload: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            // Non-file form fields are ignored
            continue;
        };

        // Defense-in-depth: the loader re-checks this, but rejecting here
        // means unsupported types never hit the disk
        if FileFormat::from_name(&filename).is_none() {
            let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
            return Err(Error::UnsupportedType(format!(".{}", ext)));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::empty_input(format!("failed to read '{}': {}", filename, e)))?;

        staged.stage(&filename, &data)?;
        files += 1;
    }

    if files == 0 {
        return Err(Error::empty_input("no files provided"));
    }

    let chunks = state.loader().process(staged.paths())?;
    if chunks.is_empty() {
        return Err(Error::empty_input("no content extracted from documents"));
    }

    let total_chunks = state.engine().ingest(chunks).await?;

    Ok(Json(UploadResponse {
        message: "Documents processed successfully".to_string(),
        total_chunks,
        files_processed: files,
    }))
}

/// POST /query - answer a question about the uploaded documents
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    if request.question.trim().is_empty() {
        return Err(Error::empty_input("question cannot be empty"));
    }

    tracing::info!("Query: \"{}\"", request.question);
    let outcome = state.engine().answer(&request.question).await;

    Ok(Json(QueryResponse {
        answer: outcome.answer,
        sources: outcome.sources,
        error: outcome.error,
    }))
}

/// GET /stats - index and model statistics
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_chunks: state.engine().stats(),
        collection_name: state.config().index.collection.clone(),
        ollama_model: state.engine().generate_model().to_string(),
        embedding_model: state.engine().embed_model().to_string(),
    })
}

/// DELETE /clear - delete the collection
pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    if state.engine().clear() {
        Ok(Json(ClearResponse {
            message: "Database cleared successfully".to_string(),
        }))
    } else {
        Err(Error::storage("failed to clear the collection"))
    }
}

/// GET /config - configuration snapshot (no secrets)
pub async fn config(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.config().snapshot())
}
