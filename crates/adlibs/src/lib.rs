//! `adlibs` - Real-time advertising analytics
//!
//! This library generates synthetic advertising campaign data, keeps a bounded
//! window of recent records, and turns it into dashboard views (KPI cards,
//! Plotly charts, a revenue forecast) and PDF reports served over HTTP.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod campaign;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod kpi;
pub mod logging;
pub mod report;
pub mod server;
pub mod stats;
pub mod stream;
pub mod theme;

pub use buffer::RecordBuffer;
pub use campaign::CampaignRecord;
pub use config::Config;
pub use dashboard::DashboardView;
pub use error::{Error, Result};
pub use generator::CampaignGenerator;
pub use logging::init_logging;
pub use stream::{DataStream, StreamHandle};
pub use theme::Theme;
