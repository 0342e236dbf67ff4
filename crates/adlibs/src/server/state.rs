//! Shared server state.

use std::sync::Arc;

use crate::buffer::RecordBuffer;
use crate::config::Config;
use crate::forecast::RevenueForecaster;
use crate::stream::StreamHandle;

use super::session::SessionStore;

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Records fed by the data stream.
    pub buffer: RecordBuffer,
    /// Handle of the data stream, when one is running.
    pub stream: Option<StreamHandle>,
    /// Per-viewer dashboard sessions.
    pub sessions: Arc<SessionStore>,
    /// Revenue forecaster.
    pub forecaster: RevenueForecaster,
}

impl AppState {
    /// Create state over `buffer` with no data stream attached.
    #[must_use]
    pub fn new(config: Config, buffer: RecordBuffer) -> Self {
        let sessions = SessionStore::new(
            config.server.max_sessions,
            config.dashboard.default_theme,
        );
        Self {
            forecaster: RevenueForecaster::from_config(&config.forecast),
            sessions: Arc::new(sessions),
            config: Arc::new(config),
            buffer,
            stream: None,
        }
    }

    /// Attach the handle of the stream feeding the buffer.
    #[must_use]
    pub fn with_stream(mut self, handle: StreamHandle) -> Self {
        self.stream = Some(handle);
        self
    }
}
