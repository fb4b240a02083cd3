use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use lumen_core::prelude::*;

use crate::config::ServerConfig;

pub struct AppState {
    pub(crate) engine: RoutingEngine,
    pub(crate) config: ServerConfig,
}

impl AppState {
    /// Loads the configured data files and builds the initial graph.
    pub fn initialize(config: ServerConfig) -> Result<Self, Error> {
        let (segments, samples) = load_inputs(&config)?;
        let engine = RoutingEngine::create(&segments, &samples, &config.graph)?;
        Ok(Self { engine, config })
    }
}

fn load_inputs(config: &ServerConfig) -> Result<(Vec<Segment>, Vec<BeautySample>), Error> {
    let segments = load_segments_geojson(&config.segments_path)?;
    let samples = load_samples_csv(&config.samples_path)?;
    Ok((segments, samples))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/graph", get(graph_info))
        .route("/route", post(route))
        .route("/rebuild", post(rebuild))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(256))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
struct GraphInfo {
    nodes: usize,
    edges: usize,
    config: GraphConfig,
}

async fn graph_info(State(state): State<Arc<AppState>>) -> Json<GraphInfo> {
    let graph = state.engine.graph();
    Json(GraphInfo {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        config: state.config.graph.clone(),
    })
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    /// `[lon, lat]`
    origin: [f64; 2],
    /// `[lon, lat]`
    destination: [f64; 2],
    #[serde(default)]
    max_snap_radius: Option<f64>,
    #[serde(default)]
    turn_penalties: Option<TurnPenalties>,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    total_weight: f64,
    legs: Vec<PathLeg>,
    geometry: geojson::Feature,
}

async fn route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let options = SolveOptions {
        max_solution_radius: request
            .max_snap_radius
            .unwrap_or(state.config.max_solution_radius),
        turn_penalties: request.turn_penalties,
    };

    let path = state.engine.solve(
        Point::new(request.origin[0], request.origin[1]),
        Point::new(request.destination[0], request.destination[1]),
        &options,
    )?;

    Ok(Json(RouteResponse {
        total_weight: path.total_weight,
        geometry: path.to_geojson(),
        legs: path.legs,
    }))
}

async fn rebuild(State(state): State<Arc<AppState>>) -> Result<Json<GraphInfo>, ApiError> {
    let worker_state = Arc::clone(&state);
    let info = tokio::task::spawn_blocking(move || -> Result<GraphInfo, Error> {
        let (segments, samples) = load_inputs(&worker_state.config)?;
        worker_state
            .engine
            .rebuild(&segments, &samples, &worker_state.config.graph)?;
        let graph = worker_state.engine.graph();
        Ok(GraphInfo {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            config: worker_state.config.graph.clone(),
        })
    })
    .await
    .map_err(|_| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: "rebuild task panicked".to_string(),
    })??;

    Ok(Json(info))
}

/// JSON error envelope with a status matching the core error kind.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = match &error {
            Error::NoPath | Error::NoNodeInRange { .. } => StatusCode::NOT_FOUND,
            Error::InvalidConfig(_) | Error::InvalidData(_) | Error::InvalidGeometry { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use geo::line_string;
    use tower::ServiceExt;

    use super::*;

    fn test_state() -> Arc<AppState> {
        let segments = vec![
            Segment::new(1, line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)]),
            Segment::new(2, line_string![(x: 0.001, y: 0.0), (x: 0.001, y: 0.001)]),
        ];
        let engine = RoutingEngine::create(&segments, &[], &GraphConfig::default()).unwrap();
        let config = ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            segments_path: "unused".into(),
            samples_path: "unused".into(),
            graph: GraphConfig::default(),
            max_solution_radius: 0.0,
        };
        Arc::new(AppState { engine, config })
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn graph_info_reports_counts_and_config() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::get("/graph").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let info: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info["nodes"], 3);
        assert_eq!(info["edges"], 4);
        assert_eq!(info["config"]["penalty_scale"], 20.0);
    }

    #[tokio::test]
    async fn route_returns_a_path() {
        let app = router(test_state());
        let body = json!({
            "origin": [0.0, 0.0],
            "destination": [0.001, 0.001],
        });
        let response = app
            .oneshot(
                Request::post("/route")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unreachable_destination_maps_to_not_found() {
        let app = router(test_state());
        // Destination is ~55 m from the nearest node, radius allows 1 m
        let body = json!({
            "origin": [0.0, 0.0],
            "destination": [0.0015, 0.001],
            "max_snap_radius": 1.0,
        });
        let response = app
            .oneshot(
                Request::post("/route")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
