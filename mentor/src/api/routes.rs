//! API routes for the Mentor server

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mentor_kg::{
    Concept, ConceptPatch, Edge, GraphAccessor, MasteryLevel, MemoryGraphStore, Mentor,
    RelationKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::ApiError;
use crate::graph_file::GraphFile;

type ApiResult<T> = Result<T, ApiError>;

/// Application state
pub struct AppState {
    pub mentor: Mentor<MemoryGraphStore>,
    /// Snapshot rewritten after every successful write, if set
    pub graph_file: Option<GraphFile>,
    /// Serializes write + save so the file never lags behind a later write
    pub write_lock: Mutex<()>,
}

impl AppState {
    pub fn new(mentor: Mentor<MemoryGraphStore>, graph_file: Option<GraphFile>) -> Self {
        Self {
            mentor,
            graph_file,
            write_lock: Mutex::new(()),
        }
    }

    async fn persist(&self) -> ApiResult<()> {
        if let Some(file) = &self.graph_file {
            file.save(&self.mentor)
                .await
                .map_err(|e| ApiError::Persist(format!("{:#}", e)))?;
        }
        Ok(())
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub graph_version: u64,
}

/// Body of `POST /concepts`
#[derive(Deserialize)]
pub struct CreateConceptRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub mastery: MasteryLevel,
    #[serde(default)]
    pub notes: String,
}

/// Body of `DELETE /edges`
#[derive(Deserialize)]
pub struct EdgeRef {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
}

/// Context-pack query parameters
#[derive(Deserialize)]
pub struct PackQuery {
    pub budget: Option<usize>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        graph_version: state.mentor.graph_version(),
    })
}

pub async fn list_concepts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Concept>>> {
    Ok(Json(state.mentor.store().to_snapshot().await.concepts))
}

pub async fn get_concept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Concept>> {
    Ok(Json(state.mentor.store().get_concept(&id).await?))
}

pub async fn create_concept(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateConceptRequest>,
) -> ApiResult<impl IntoResponse> {
    let concept = Concept::new(payload.id, payload.title, payload.summary)
        .with_mastery(payload.mastery)
        .with_notes(payload.notes);

    let _guard = state.write_lock.lock().await;
    let committed = state.mentor.writer().create_concept(concept).await?;
    state.persist().await?;

    Ok((StatusCode::CREATED, Json(committed.record)))
}

pub async fn update_concept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<ConceptPatch>,
) -> ApiResult<Json<Concept>> {
    let _guard = state.write_lock.lock().await;
    let committed = state.mentor.writer().update_concept(&id, patch).await?;
    state.persist().await?;

    Ok(Json(committed.record))
}

pub async fn delete_concept(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let _guard = state.write_lock.lock().await;
    state.mentor.writer().delete_concept(&id).await?;
    state.persist().await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_edge(
    State(state): State<Arc<AppState>>,
    Json(edge): Json<Edge>,
) -> ApiResult<impl IntoResponse> {
    let _guard = state.write_lock.lock().await;
    let committed = state.mentor.writer().create_edge(edge).await?;
    state.persist().await?;

    Ok((StatusCode::CREATED, Json(committed.record)))
}

pub async fn delete_edge(
    State(state): State<Arc<AppState>>,
    Json(edge): Json<EdgeRef>,
) -> ApiResult<StatusCode> {
    let _guard = state.write_lock.lock().await;
    state
        .mentor
        .writer()
        .delete_edge(&edge.source, &edge.target, edge.kind)
        .await?;
    state.persist().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /concepts/:id/context-pack?budget=N`
pub async fn context_pack(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    params: Result<Query<PackQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = params?;
    let pack = state.mentor.context_pack(&id, params.budget).await?;
    Ok(Json(pack))
}

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.mentor.cache_stats().await)
}
