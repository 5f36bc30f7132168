//! HTTP front end: home page, loading page and the profile API.

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{Config, Dispatcher, ProfileRequest, UiError, UiResult, open_after};

const HOME_TEMPLATE: &str = include_str!("../templates/default.html");
const LOADING_TEMPLATE: &str = include_str!("../templates/loading.html");

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
    pub options: Option<String>,
}

impl UiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UiError::InvalidRequest(_) | UiError::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::warn!("rejected request: {self}");
        }
        (status, self.to_string()).into_response()
    }
}

pub fn create_app(dispatcher: Arc<Dispatcher>) -> Router {
    let static_dir = dispatcher.config().static_dir.clone();
    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/loading", get(loading_handler))
        .route("/check", get(check_handler))
        .route("/profile", get(profile_handler))
        .with_state(AppState { dispatcher });
    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }
    app.layer(TraceLayer::new_for_http())
}

/// Home page; app assets are linked only when `/static` is mounted.
pub fn render_home(config: &Config, timestamp: i64) -> String {
    let (app_css, app_js) = match config.static_dir {
        Some(_) => (
            format!("  <link rel=\"stylesheet\" href=\"/static/css/app.css?t={timestamp}\">\n"),
            format!("  <script src=\"/static/js/app.js?t={timestamp}\"></script>\n"),
        ),
        None => (String::new(), String::new()),
    };
    HOME_TEMPLATE
        .replace("{{ app_css }}", &app_css)
        .replace("{{ app_js }}", &app_js)
        .replace("{{ timestamp }}", &timestamp.to_string())
        .replace("{{ mdc_base_url }}", &config.asset_base_url)
}

async fn home_handler(State(state): State<AppState>) -> Html<String> {
    let timestamp = time::OffsetDateTime::now_utc().unix_timestamp();
    Html(render_home(state.dispatcher.config(), timestamp))
}

async fn loading_handler() -> Html<&'static str> {
    Html(LOADING_TEMPLATE)
}

async fn check_handler() -> &'static str {
    "ok"
}

async fn profile_handler(
    State(state): State<AppState>,
    Query(params): Query<ProfileParams>,
) -> Result<Response, UiError> {
    let text = params.options.ok_or_else(|| {
        UiError::InvalidRequest("missing `options` query parameter".to_string())
    })?;
    let request = ProfileRequest::from_json(&text)?;
    let dispatcher = state.dispatcher.clone();
    let output = tokio::task::spawn_blocking(move || dispatcher.dispatch(request))
        .await
        .map_err(|e| UiError::Engine(format!("profile task failed: {e}")))??;
    // Body only; the browser decides what it is looking at.
    Ok(Response::new(Body::from(output.into_bytes())))
}

pub async fn bind(port: u16) -> UiResult<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    Ok(TcpListener::bind(addr).await?)
}

/// Browser-facing URL for the port `listener` actually bound.
pub fn local_url(listener: &TcpListener) -> UiResult<String> {
    let port = listener.local_addr()?.port();
    Ok(format!("http://localhost:{port}"))
}

/// Serves on `listener` until the process is stopped.
pub async fn run_server(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    open_browser: bool,
) -> UiResult<()> {
    dispatcher.scratch().ensure_clean()?;
    let url = local_url(&listener)?;
    tracing::info!("profiler UI listening on {url}");
    if open_browser {
        let delay = Duration::from_millis(dispatcher.config().browser_delay_ms);
        let _ = open_after(url, delay);
    }
    let app = create_app(dispatcher);
    axum::serve(listener, app).await?;
    Ok(())
}
