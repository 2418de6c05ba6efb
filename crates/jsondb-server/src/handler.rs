use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use jsondb_store::{Document, DocumentStore, StoreError, StoreResult};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state handed to every handler.
///
/// The store is injected at construction time; handlers never reach for a
/// global.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    collection: Arc<str>,
    not_found_as_404: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            collection: Arc::from(config.collection.as_str()),
            not_found_as_404: config.not_found_as_404,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run a store operation on the blocking pool.
    async fn run<T, F>(&self, op: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentStore, &str) -> StoreResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let collection = Arc::clone(&self.collection);
        let result = tokio::task::spawn_blocking(move || op(store.as_ref(), &collection))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        result.map_err(|e| self.store_error(e))
    }

    fn store_error(&self, err: StoreError) -> ServerError {
        if self.not_found_as_404 && err.is_not_found() {
            ServerError::NotFound(err.to_string())
        } else {
            ServerError::Store(err)
        }
    }
}

fn require_id(id: &str) -> ServerResult<()> {
    if id.is_empty() {
        return Err(ServerError::BadRequest("Missing id".into()));
    }
    Ok(())
}

/// `POST /create`: store the body under a freshly generated id.
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let mut doc: Document = serde_json::from_slice(&body)
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let id = Uuid::new_v4().to_string();
    doc.insert("id".into(), Value::String(id.clone()));

    let write_id = id.clone();
    state
        .run(move |store, collection| store.write(collection, &write_id, &doc))
        .await?;

    tracing::info!(collection = state.collection(), %id, "document created");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `GET /read/:id`
pub async fn read_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Document>> {
    require_id(&id)?;
    let doc = state
        .run(move |store, collection| store.read(collection, &id))
        .await?;
    Ok(Json(doc))
}

/// `GET /readall`
pub async fn read_all_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<Document>>> {
    let docs = state
        .run(|store, collection| store.read_all(collection))
        .await?;
    Ok(Json(docs))
}

/// `DELETE /delete/:id`
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    require_id(&id)?;
    let deleted = id.clone();
    state
        .run(move |store, collection| store.delete(collection, &id))
        .await?;
    tracing::info!(collection = state.collection(), id = %deleted, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /read/` and `DELETE /delete/` without an id.
pub async fn missing_id_handler() -> ServerError {
    ServerError::BadRequest("Missing id".into())
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "jsondb-server",
        "version": env!("CARGO_PKG_VERSION"),
        "collection": state.collection(),
    }))
}
