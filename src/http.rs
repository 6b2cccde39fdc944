//! HTTP query gateway: exposes the graph queries as JSON endpoints.
//!
//! Routes and payload shapes match the original survey-map application:
//! `/query` and `/vendors_in_box` take a bounding box, `/mac_location` and
//! `/mac_summary` take a MAC address, `/macs` lists known devices. The
//! gateway owns request parsing, the empty-result 404 on `/mac_location`,
//! and the error-to-status mapping; all query semantics live in `query/`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{MacscopeError, Result};
use crate::query;
use crate::query::VendorReport;
use crate::schema::{GeoPoint, Sighting};
use crate::store::GraphStore;

/// Check if a port is available by attempting to bind to it
async fn check_port_available(port: u16) -> bool {
    tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .is_ok()
}

/// HTTP server wrapper around the query layer.
pub struct ApiServer {
    store: Arc<dyn GraphStore>,
    allowed_origins: Vec<String>,
}

impl ApiServer {
    pub fn new(store: Arc<dyn GraphStore>, config: &Config) -> Self {
        Self {
            store,
            allowed_origins: config.http.allowed_origins.clone(),
        }
    }

    /// Run the HTTP server until shutdown.
    pub async fn run(&self, port: u16) -> Result<()> {
        let app = self.create_router();

        let addr = format!("127.0.0.1:{}", port);
        if !check_port_available(port).await {
            return Err(MacscopeError::Config(format!(
                "Port {} is already in use. Another process (possibly a previous macscope \
                 instance) is using this port; stop it or set http.port in config.toml.",
                port
            )));
        }

        log::info!("Starting HTTP query gateway on http://{}", addr);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            MacscopeError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!("Failed to bind to {}: {}", addr, e),
            ))
        })?;

        axum::serve(listener, app).await.map_err(|e| {
            MacscopeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

        Ok(())
    }

    /// Create the axum router
    fn create_router(&self) -> Router {
        // If allowed_origins is configured, restrict CORS to exactly those;
        // otherwise allow Any for local use, like the original single-host app.
        let cors = if self.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        router(Arc::clone(&self.store)).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    store: Arc<dyn GraphStore>,
}

fn router(store: Arc<dyn GraphStore>) -> Router {
    Router::new()
        .route("/query", post(handle_query))
        .route("/mac_location", post(handle_mac_location))
        .route("/macs", get(handle_macs))
        .route("/mac_summary", post(handle_mac_summary))
        .route("/vendors_in_box", post(handle_vendors_in_box))
        .route("/health", get(handle_health))
        .with_state(AppState { store })
}

/// Bounding-box request body. Coordinates arrive as JSON numbers or numeric
/// strings (the original client sent form-ish strings), so fields stay raw
/// until `parse_coord`.
#[derive(Debug, Deserialize)]
struct BoxRequest {
    #[serde(rename = "topLat")]
    top_lat: Option<serde_json::Value>,
    #[serde(rename = "topLon")]
    top_lon: Option<serde_json::Value>,
    #[serde(rename = "bottomLat")]
    bottom_lat: Option<serde_json::Value>,
    #[serde(rename = "bottomLon")]
    bottom_lon: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MacRequest {
    mac_address: Option<String>,
}

fn parse_coord(value: Option<&serde_json::Value>, name: &str) -> Result<f64> {
    let value =
        value.ok_or_else(|| MacscopeError::InvalidCoordinate(format!("{} is missing", name)))?;
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| MacscopeError::InvalidCoordinate(format!("{} is not a number", name))),
        serde_json::Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            MacscopeError::InvalidCoordinate(format!("{} is not a number: {:?}", name, s))
        }),
        _ => Err(MacscopeError::InvalidCoordinate(format!(
            "{} is not a number",
            name
        ))),
    }
}

fn parse_box(req: &BoxRequest) -> Result<(f64, f64, f64, f64)> {
    Ok((
        parse_coord(req.top_lat.as_ref(), "topLat")?,
        parse_coord(req.top_lon.as_ref(), "topLon")?,
        parse_coord(req.bottom_lat.as_ref(), "bottomLat")?,
        parse_coord(req.bottom_lon.as_ref(), "bottomLon")?,
    ))
}

fn error_response(err: MacscopeError) -> Response {
    let status = match &err {
        MacscopeError::InvalidCoordinate(_) | MacscopeError::MissingParameter(_) => {
            StatusCode::BAD_REQUEST
        }
        MacscopeError::Store(_) | MacscopeError::Row(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        log::error!("Request failed: {}", err);
    }
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

async fn handle_query(State(state): State<AppState>, Json(req): Json<BoxRequest>) -> Response {
    match run_query(&state, &req).await {
        Ok(sightings) => (StatusCode::OK, Json(sightings)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn run_query(state: &AppState, req: &BoxRequest) -> Result<Vec<Sighting>> {
    let (top_lat, top_lon, bottom_lat, bottom_lon) = parse_box(req)?;
    query::query_in_box(state.store.as_ref(), top_lat, top_lon, bottom_lat, bottom_lon).await
}

async fn handle_mac_location(
    State(state): State<AppState>,
    Json(req): Json<MacRequest>,
) -> Response {
    let mac = req.mac_address.as_deref().unwrap_or("");
    match query::locations_for_mac(state.store.as_ref(), mac).await {
        // Zero locations is a retrievable-but-empty condition: 404 with an
        // empty payload, exactly like the original handler. Unknown MAC and
        // known-but-unsighted MAC are deliberately indistinguishable.
        Ok(locations) if locations.is_empty() => {
            (StatusCode::NOT_FOUND, Json(Vec::<GeoPoint>::new())).into_response()
        }
        Ok(locations) => (StatusCode::OK, Json(locations)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn handle_macs(State(state): State<AppState>) -> Response {
    match query::known_macs(state.store.as_ref()).await {
        Ok(macs) => (StatusCode::OK, Json(macs)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn handle_mac_summary(
    State(state): State<AppState>,
    Json(req): Json<MacRequest>,
) -> Response {
    let mac = req.mac_address.as_deref().unwrap_or("");
    match query::summarize_mac(state.store.as_ref(), mac).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn handle_vendors_in_box(
    State(state): State<AppState>,
    Json(req): Json<BoxRequest>,
) -> Response {
    match run_vendors(&state, &req).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn run_vendors(state: &AppState, req: &BoxRequest) -> Result<VendorReport> {
    let (top_lat, top_lon, bottom_lat, bottom_lon) = parse_box(req)?;
    query::vendors_in_box(state.store.as_ref(), top_lat, top_lon, bottom_lat, bottom_lon).await
}

async fn handle_health() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}
