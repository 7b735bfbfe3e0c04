//! HTTP API for the patient registry
//!
//! Routes, mounted once per configured prefix `P`:
//! - `GET P` list, `POST P` create
//! - `GET P/:id` get, `PUT P/:id` update, `DELETE P/:id` delete
//! - `GET /health`
//!
//! Every prefix is backed by the same [`PatientStore`].

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::common::secret::SecretHasher;
use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::validation::validate_patient_name;
use crate::common::{Config, Error, Result};
use crate::registry::model::{Patient, PatientDraft, PatientId, PatientPatch};
use crate::registry::store::PatientStore;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct RegistryState {
    pub store: Arc<PatientStore>,
    pub hasher: Arc<dyn SecretHasher>,
}

impl RegistryState {
    pub fn new(store: Arc<PatientStore>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { store, hasher }
    }
}

/// Creates the router with the patient routes mounted under every prefix.
pub fn create_router<S: AsRef<str>>(state: RegistryState, prefixes: &[S]) -> Router {
    let mut router = Router::new().route("/health", get(health));

    for prefix in prefixes {
        let prefix = prefix.as_ref();
        router = router
            .route(
                prefix,
                get(list_patients)
                    .post(create_patient)
                    .fallback(method_not_allowed),
            )
            .route(
                &format!("{}/:id", prefix),
                get(get_patient)
                    .put(update_patient)
                    .delete(delete_patient)
                    .fallback(method_not_allowed),
            );
    }

    router.with_state(state)
}

/// [`create_router`] wrapped in the request middleware stack: request IDs and
/// logging, body size limit, and per-request timeout.
pub fn create_app(state: RegistryState, config: &Config) -> Router {
    create_router(state, &config.route_prefixes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(middleware::from_fn(request_tracing_middleware))
}

fn parse_id(raw: &str) -> Result<PatientId> {
    raw.parse()
        .map_err(|_| Error::BadRequest(format!("invalid patient id: {:?}", raw)))
}

/// Decoding failures are 400, except a body cut off by the size limit, which
/// stays 413 whether or not the client sent `Content-Length`.
fn decode<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(rejection.body_text())
        } else {
            Error::BadRequest(rejection.body_text())
        }
    })
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_secret(hasher: Arc<dyn SecretHasher>, secret: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hasher.hash(&secret))
        .await
        .map_err(|e| Error::Internal(format!("hashing task failed: {}", e)))?
}

async fn list_patients(State(state): State<RegistryState>) -> Json<Vec<Patient>> {
    Json(state.store.list())
}

async fn create_patient(
    State(state): State<RegistryState>,
    payload: std::result::Result<Json<PatientDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>)> {
    let mut draft = decode(payload)?;
    validate_patient_name(&draft.name)?;
    draft.secret = hash_secret(state.hasher.clone(), draft.secret).await?;

    let patient = state.store.create(draft);
    tracing::info!(patient_id = patient.id, "patient registered");
    Ok((StatusCode::CREATED, Json(patient)))
}

async fn get_patient(
    State(state): State<RegistryState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Patient>> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.store.get(id)?))
}

async fn update_patient(
    State(state): State<RegistryState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<PatientPatch>, JsonRejection>,
) -> Result<Json<Patient>> {
    let id = parse_id(&raw_id)?;
    let mut patch = decode(payload)?;
    validate_patient_name(&patch.name)?;
    if !patch.secret.is_empty() {
        patch.secret = hash_secret(state.hasher.clone(), patch.secret).await?;
    }

    let patient = state.store.update(id, patch)?;
    tracing::info!(patient_id = id, "patient updated");
    Ok(Json(patient))
}

async fn delete_patient(
    State(state): State<RegistryState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&raw_id)?;
    state.store.delete(id)?;
    tracing::info!(patient_id = id, "patient deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

async fn health(State(state): State<RegistryState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "patients": state.store.len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
