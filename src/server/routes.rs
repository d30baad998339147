//! HTTP API routes
//!
//! REST endpoints for driving an acquisition run and observing its
//! snapshots.

use crate::coordinator::Snapshot;
use crate::server::state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/acquire/start", post(start_handler))
        .route("/api/acquire/stop", post(stop_handler))
        .route("/api/snapshot", get(snapshot_handler))
        .route("/api/status", get(status_handler))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "ALREADY_ACQUIRING" => StatusCode::CONFLICT,
            "SERVICE_DOWN" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, Json(self)).into_response()
    }
}

/// Start response body
#[derive(Debug, Serialize, Deserialize)]
pub struct StartResponse {
    pub started: bool,
}

/// Stop response body
#[derive(Debug, Serialize, Deserialize)]
pub struct StopResponse {
    pub stopped: bool,
}

/// Server status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub source: String,
    pub is_acquiring: bool,
    pub is_geocoding: bool,
}

/// Begin an acquisition run
///
/// POST /api/acquire/start
async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<StartResponse>, ApiError> {
    let started = state.handle().start().await.map_err(|e| ApiError {
        error: e.to_string(),
        code: "SERVICE_DOWN".to_string(),
    })?;

    if !started {
        return Err(ApiError {
            error: "an acquisition run is already in progress".to_string(),
            code: "ALREADY_ACQUIRING".to_string(),
        });
    }

    Ok(Json(StartResponse { started }))
}

/// End the current acquisition run
///
/// POST /api/acquire/stop
async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopResponse>, ApiError> {
    let stopped = state.handle().stop().await.map_err(|e| ApiError {
        error: e.to_string(),
        code: "SERVICE_DOWN".to_string(),
    })?;

    // Stopping an idle session is a no-op, not an error
    Ok(Json(StopResponse { stopped }))
}

/// Latest session snapshot
///
/// GET /api/snapshot
async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    Json(state.handle().snapshot())
}

/// Server status
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.handle().snapshot();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.source_name().to_string(),
        is_acquiring: snapshot.is_acquiring,
        is_geocoding: snapshot.is_geocoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::service::AcquisitionService;
    use crate::coordinator::Coordinator;
    use crate::geocode::{Address, GeocodeResult, ReverseGeocoder};
    use crate::source::replay::{ReplaySource, ReplayStep};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct StubGeocoder;

    impl ReverseGeocoder for StubGeocoder {
        async fn reverse_geocode(&self, _coords: crate::coord::Coordinates) -> GeocodeResult {
            Ok(Address {
                locality: Some("Sutton Coldfield".to_string()),
                ..Default::default()
            })
        }
    }

    fn create_test_state() -> Arc<AppState> {
        // A slow script keeps the run alive long enough to observe it
        let source = ReplaySource::from_steps(vec![ReplayStep::Fix {
            lat: 40.7128,
            lng: -74.0060,
            accuracy: 165.0,
            age_ms: 0,
            delay_ms: 200,
        }]);
        let service =
            AcquisitionService::new(Coordinator::default(), Box::new(source), StubGeocoder);
        let (handle, _task) = service.spawn();
        Arc::new(AppState::new(handle, "replay"))
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let state = create_test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(status.source, "replay");
        assert!(!status.is_acquiring);
    }

    #[tokio::test]
    async fn test_snapshot_endpoint() {
        let state = create_test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/snapshot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let snapshot: Snapshot = serde_json::from_slice(&body).unwrap();

        assert!(snapshot.current_fix.is_none());
        assert!(!snapshot.is_acquiring);
    }

    #[tokio::test]
    async fn test_start_then_conflict() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let start: StartResponse = serde_json::from_slice(&body).unwrap();
        assert!(start.started);

        // Second start while the run is still live: conflict
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "ALREADY_ACQUIRING");
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let state = create_test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let stop: StopResponse = serde_json::from_slice(&body).unwrap();
        assert!(!stop.stopped);
    }

    #[tokio::test]
    async fn test_start_stop_cycle() {
        let state = create_test_state();

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let stop: StopResponse = serde_json::from_slice(&body).unwrap();
        assert!(stop.stopped);

        // A new run may start after the stop
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/acquire/start")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
