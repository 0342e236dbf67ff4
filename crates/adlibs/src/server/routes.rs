//! JSON and download endpoints under `/api`.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::campaign::CampaignRecord;
use crate::dashboard::DashboardView;
use crate::error::{Error, Result};
use crate::report::{render_report, report_file_name};
use crate::stream::StreamStatus;
use crate::theme::Theme;

use super::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/records", get(records))
        .route("/stream", get(stream_status))
        .route("/report", get(download_report))
}

/// Query of a dashboard refresh.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Viewer session id. Without one, KPI trends are not tracked.
    pub session: Option<String>,
    /// Theme to switch to, `light` or `dark`.
    pub theme: Option<String>,
}

/// Response of `GET /api/records`.
#[derive(Debug, Serialize)]
struct RecordsResponse {
    count: usize,
    capacity: usize,
    total_generated: u64,
    records: Vec<CampaignRecord>,
}

/// Response of `GET /api/stream`.
#[derive(Debug, Serialize)]
struct StreamResponse {
    enabled: bool,
    status: Option<StreamStatus>,
}

/// Render the dashboard for a viewer.
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>> {
    let theme = query
        .theme
        .as_deref()
        .filter(|theme| !theme.is_empty())
        .map(str::parse::<Theme>)
        .transpose()?;
    let records = state.buffer.snapshot();

    let view = match query.session.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let mut session = state.sessions.checkout(id, theme);
            let view = DashboardView::render(
                &records,
                session.theme,
                Some(&mut session.tracker),
                &state.forecaster,
            );
            state.sessions.save(id, session);
            view
        }
        None => DashboardView::render(
            &records,
            theme.unwrap_or(state.config.dashboard.default_theme),
            None,
            &state.forecaster,
        ),
    };

    debug!(records = view.record_count, theme = %view.theme, "Rendered dashboard");
    Ok(Json(view))
}

/// Snapshot of the buffered records.
async fn records(State(state): State<AppState>) -> Json<RecordsResponse> {
    let records = state.buffer.snapshot();
    Json(RecordsResponse {
        count: records.len(),
        capacity: state.buffer.capacity(),
        total_generated: state.buffer.total_generated(),
        records,
    })
}

/// Status of the data stream.
async fn stream_status(State(state): State<AppState>) -> Json<StreamResponse> {
    Json(StreamResponse {
        enabled: state.stream.is_some(),
        status: state.stream.as_ref().map(|handle| handle.status()),
    })
}

/// Render the PDF report as a download.
async fn download_report(State(state): State<AppState>) -> Result<Response> {
    let records = state.buffer.snapshot();
    let count = records.len();
    let bytes = tokio::task::spawn_blocking(move || render_report(&records))
        .await
        .map_err(|e| Error::internal(format!("report task failed: {e}")))??;

    let file_name = report_file_name(&state.config.report.file_prefix, &Local::now());
    info!(records = count, file = %file_name, "Serving report");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
