//! HTTP server for the directory API

use super::handler::{
    board_handler, delete_user_handler, download_csv_handler, filter_handler, get_user_handler,
    keywords_handler, list_users_handler, status_handler, update_user_handler, upload_csv_handler,
};
use crate::config::ServerConfig;
use crate::roster::Roster;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<RwLock<Roster>>,
    api_key: Arc<str>,
    /// Roster file rewritten after every change
    pub csv_path: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(roster: Arc<RwLock<Roster>>, config: &ServerConfig) -> Self {
        Self {
            roster,
            api_key: Arc::from(config.api_key.as_str()),
            csv_path: config.roster_csv.clone().map(Arc::new),
        }
    }

    /// An empty configured key leaves the API open
    fn accepts(&self, presented: Option<&str>) -> bool {
        self.api_key.is_empty() || presented == Some(&*self.api_key)
    }
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !state.accepts(presented) {
        warn!(path = %request.uri().path(), "rejected request with missing or wrong api key");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response();
    }

    next.run(request).await
}

/// HTTP server exposing the directory API
pub struct HttpServer {
    state: AppState,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(roster: Arc<RwLock<Roster>>, config: ServerConfig) -> Self {
        let state = AppState::new(roster, &config);
        Self { state, config }
    }

    /// Routes with auth and CORS applied; `/api/status` stays public
    pub fn router(&self) -> Router {
        let protected = Router::new()
            .route("/users", get(list_users_handler))
            .route("/users/:id", get(get_user_handler))
            .route("/filter", post(filter_handler))
            .route("/keywords", post(keywords_handler))
            .route("/update_user/:id", put(update_user_handler))
            .route("/delete_user/:id", delete(delete_user_handler))
            .route("/download_csv", get(download_csv_handler))
            .route("/upload_csv", post(upload_csv_handler))
            .route("/graph", post(board_handler))
            .route_layer(middleware::from_fn_with_state(self.state.clone(), require_api_key));

        Router::new()
            .route("/api/status", get(status_handler))
            .merge(protected)
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        if self.config.api_key.is_empty() {
            warn!("no api key configured, every route is open");
        }
        info!("Directory API listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
