//! Dashboard HTTP server.
//!
//! This module provides the axum application with:
//! - The dashboard page at `/`
//! - A health check at `/health`
//! - Dashboard, record, stream and report endpoints under `/api`

use std::time::Duration;

use axum::{
    extract::State, http::StatusCode, response::Html, response::IntoResponse, routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{classify::ServerErrorsFailureClass, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn, Level, Span};

use crate::buffer::RecordBuffer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stream::DataStream;

pub mod routes;
pub mod session;
pub mod state;

pub use session::{Session, SessionStore};
pub use state::AppState;

const DASHBOARD_PAGE: &str = include_str!("../../assets/dashboard.html");

/// Create the application router.
pub fn create_app(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/api", routes::create_router())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http().on_failure(log_failure))
        .with_state(state)
}

/// Level at which a failed response is logged.
///
/// 503 means the buffer has no records yet, which is normal until the
/// stream produces its first batch.
fn failure_level(class: &ServerErrorsFailureClass) -> Level {
    match class {
        ServerErrorsFailureClass::StatusCode(StatusCode::SERVICE_UNAVAILABLE) => Level::DEBUG,
        _ => Level::ERROR,
    }
}

fn log_failure(class: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    if failure_level(&class) == Level::ERROR {
        error!(classification = %class, ?latency, "Response failed");
    } else {
        debug!(classification = %class, ?latency, "Response unavailable");
    }
}

/// The dashboard page.
async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = &state.config.dashboard;
    let refresh_ms = state.config.refresh_interval().as_millis();
    Html(
        DASHBOARD_PAGE
            .replace("{{TITLE}}", &dashboard.title)
            .replace("{{REFRESH_MS}}", &refresh_ms.to_string())
            .replace("{{DEFAULT_THEME}}", &dashboard.default_theme.to_string()),
    )
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "adlibs",
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.buffer.len(),
        "stream_running": state.stream.as_ref().is_some_and(|s| s.is_running()),
    }))
}

/// Run the dashboard server until Ctrl-C.
///
/// Unless `with_stream` is false, a [`DataStream`] feeds the buffer for the
/// lifetime of the server and is stopped on shutdown.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn start_server(config: Config, with_stream: bool) -> Result<()> {
    let addr = config.socket_addr();
    let buffer = RecordBuffer::new(config.buffer.capacity);
    let mut state = AppState::new(config.clone(), buffer.clone());

    let producer = with_stream.then(|| DataStream::from_config(&config, buffer).spawn());
    if let Some((handle, _)) = &producer {
        state = state.with_stream(handle.clone());
    }

    let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })?;

    info!("Starting Ad-Libs dashboard on http://{}", addr);
    if producer.is_none() {
        info!("Data stream disabled; the buffer stays empty");
    }

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some((handle, task)) = producer {
        handle.stop();
        if let Err(e) = task.await {
            warn!("Data stream task failed: {}", e);
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use axum::body::{self, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::generator::CampaignGenerator;

    fn state_with_records(count: usize) -> AppState {
        crate::logging::init_test_logging();
        let config = Config::default();
        let buffer = RecordBuffer::new(config.buffer.capacity);
        buffer.extend(CampaignGenerator::new(Some(3)).generate_batch(count));
        AppState::new(config, buffer)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, json) = get_json(create_app(state_with_records(3)), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["records"], 3);
        assert_eq!(json["stream_running"], false);
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, headers, body) = get(create_app(state_with_records(0)), "/").await;
        let page = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(page.contains("<title>Ad-Libs</title>"));
        assert!(page.contains("300000"));
        assert!(!page.contains("{{"));
    }

    #[tokio::test]
    async fn test_dashboard_empty_buffer() {
        let (status, json) =
            get_json(create_app(state_with_records(0)), "/api/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["record_count"], 0);
        assert_eq!(json["kpis"]["peak"], "N/A");
        assert_eq!(json["kpis"]["rpc"]["text"], "$0");
    }

    #[tokio::test]
    async fn test_dashboard_theme_query() {
        let (status, json) = get_json(
            create_app(state_with_records(5)),
            "/api/dashboard?theme=dark",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["styles"]["header"]["backgroundColor"], "#1c1c1c");
    }

    #[tokio::test]
    async fn test_dashboard_unknown_theme() {
        let (status, json) = get_json(
            create_app(state_with_records(5)),
            "/api/dashboard?theme=sepia",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("sepia"));
    }

    #[tokio::test]
    async fn test_dashboard_empty_theme_falls_back() {
        let app = create_app(state_with_records(5));

        let (status, json) = get_json(app.clone(), "/api/dashboard?theme=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["theme"], "light");

        get_json(app.clone(), "/api/dashboard?session=tab1&theme=dark").await;
        let (status, json) = get_json(app, "/api/dashboard?session=tab1&theme=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["theme"], "dark");
    }

    #[tokio::test]
    async fn test_dashboard_session_remembers_theme_and_kpis() {
        let state = state_with_records(5);
        let app = create_app(state.clone());

        let (_, first) = get_json(app.clone(), "/api/dashboard?session=tab1&theme=dark").await;
        assert_eq!(first["kpis"]["rpc"]["trend"], "flat");

        state
            .buffer
            .extend(CampaignGenerator::new(Some(4)).generate_batch(5));
        let (_, second) = get_json(app, "/api/dashboard?session=tab1").await;

        assert_eq!(second["theme"], "dark");
        assert_ne!(second["kpis"]["rpc"]["trend"], "flat");
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_records_endpoint() {
        let (status, json) = get_json(create_app(state_with_records(7)), "/api/records").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 7);
        assert_eq!(json["capacity"], 50);
        assert_eq!(json["records"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_stream_endpoint_without_stream() {
        let (status, json) = get_json(create_app(state_with_records(0)), "/api/stream").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["enabled"], false);
        assert!(json["status"].is_null());
    }

    #[tokio::test]
    async fn test_report_download() {
        let (status, headers, body) =
            get(create_app(state_with_records(10)), "/api/report").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"ad_performance_report_"));
        assert!(disposition.ends_with(".pdf\""));
        assert!(body.starts_with(b"%PDF"));
    }

    #[test]
    fn test_failure_level() {
        let unavailable = ServerErrorsFailureClass::StatusCode(StatusCode::SERVICE_UNAVAILABLE);
        let internal = ServerErrorsFailureClass::StatusCode(StatusCode::INTERNAL_SERVER_ERROR);
        let transport = ServerErrorsFailureClass::Error("connection reset".to_string());

        assert_eq!(failure_level(&unavailable), Level::DEBUG);
        assert_eq!(failure_level(&internal), Level::ERROR);
        assert_eq!(failure_level(&transport), Level::ERROR);
    }

    #[tokio::test]
    async fn test_report_empty_buffer() {
        let (status, json) = get_json(create_app(state_with_records(0)), "/api/report").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["error"].is_string());
    }
}
