// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facegen Server - model uploads and planar face generation.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/tessellate` - Tessellate a document and return it
//! - `POST /api/v1/models` - Validate and store an upload
//! - `GET /api/v1/models` - List stored models
//! - `GET /api/v1/models/:name` - Retrieve a stored model
//! - `GET /api/v1/models/:name/status` - Latest face generation status
//! - `POST /api/v1/events/object-created` - Run face generation for a staged object

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use facegen_processing::{BlobStore, FacesPipeline, InMemoryBlobStore, InMemoryStatusStore, StatusStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub blobs: Arc<dyn BlobStore>,
    pub statuses: Arc<dyn StatusStore>,
    pub pipeline: FacesPipeline,
}

impl AppState {
    /// State backed by in-memory stores.
    pub fn in_memory(config: Config) -> Self {
        let blobs: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
        let statuses: Arc<dyn StatusStore> = Arc::new(InMemoryStatusStore::new());
        let pipeline = FacesPipeline::new(blobs.clone(), statuses.clone())
            .with_options(config.tessellation_options())
            .with_parallel(config.parallel_elements);

        Self {
            config: Arc::new(config),
            blobs,
            statuses,
            pipeline,
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        .route("/api/v1/tessellate", post(routes::tessellate::tessellate))
        .route(
            "/api/v1/models",
            get(routes::models::list).post(routes::models::upload),
        )
        .route("/api/v1/models/:name", get(routes::models::get))
        .route("/api/v1/models/:name/status", get(routes::models::status))
        .route(
            "/api/v1/events/object-created",
            post(routes::events::object_created),
        )
        .layer(DefaultBodyLimit::max(config.max_body_size_mb * 1024 * 1024))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,facegen_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        site_bucket = %config.site_bucket,
        staging_bucket = %config.staging_bucket,
        data_folder = %config.data_folder,
        worker_threads = config.worker_threads,
        axis_strategy = ?config.axis_strategy,
        parallel_elements = config.parallel_elements,
        "Starting Facegen Server"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(AppState::in_memory(config));

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use facegen_processing::TagSet;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let state = AppState::in_memory(Config::default());
        (build_router(state.clone()), state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, body) = send(app, "GET", "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_tessellate_wall() {
        let (app, _) = app();
        let document = json!({
            "payload": {"planarElements": [
                {"vertices": [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]], "metadata": {"kind": "wall"}}
            ]}
        });

        let (status, body) = send(app, "POST", "/api/v1/tessellate", Some(document)).await;
        assert_eq!(status, StatusCode::OK);
        let element = &body["document"]["payload"]["planarElements"][0];
        assert_eq!(element["faceVertices"].as_array().unwrap().len(), 2);
        assert_eq!(element["metadata"]["kind"], "wall");
        assert_eq!(body["stats"]["fallback_elements"], 1);
    }

    #[tokio::test]
    async fn test_tessellate_missing_payload() {
        let (app, _) = app();
        let (status, body) =
            send(app, "POST", "/api/v1/tessellate", Some(json!({"modelInformation": {}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_units() {
        let (app, _) = app();
        let upload = json!({"modelInformation": {"name": "a", "units": "cubits"}, "payload": []});
        let (status, body) = send(app, "POST", "/api/v1/models", Some(upload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "'units' values must be either 'imperial' or 'metric'");
    }

    #[tokio::test]
    async fn test_linear_upload_is_listed() {
        let (app, _) = app();
        let upload = json!({
            "modelInformation": {"name": "frame", "units": "imperial"},
            "payload": [{"vertices": [[0, 0, 0], [0, 0, 10]], "metadata": {"kind": "beam"}}]
        });

        let (status, body) = send(app.clone(), "POST", "/api/v1/models", Some(upload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["staged"], false);

        let (status, models) = send(app, "GET", "/api/v1/models", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(models.as_array().unwrap().len(), 1);
        assert_eq!(models[0]["s3_attributes"]["units"], "imperial");
    }

    #[tokio::test]
    async fn test_object_created_event() {
        let (app, state) = app();
        let document = json!({
            "modelInformation": {"name": "shed", "destination": "model-viewer-site"},
            "payload": {"planarElements": [
                {"vertices": [[0, 0, 0], [3, 0, 0], [3, 2, 0], [0, 2, 0]]}
            ]}
        });
        state
            .blobs
            .put_object(
                "model-viewer-faces-staging",
                "data/my shed.json",
                serde_json::to_vec(&document).unwrap(),
                &TagSet::from_query("destination=model-viewer-site&units=metric"),
            )
            .unwrap();

        let event = json!({"bucket": "model-viewer-faces-staging", "key": "data/my+shed.json"});
        let (status, body) =
            send(app.clone(), "POST", "/api/v1/events/object-created", Some(event)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "my shed");
        assert_eq!(body["stats"]["total_faces"], 2);

        let (status, model) = send(app.clone(), "GET", "/api/v1/models/my%20shed", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(model["modelInformation"].get("destination").is_none());

        let (status, latest) = send(app, "GET", "/api/v1/models/my%20shed/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["latestStatus"], "complete");
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let (app, _) = app();
        let (status, body) = send(app, "GET", "/api/v1/models/ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
