//! Declarative chart definitions.
//!
//! Figures serialize to Plotly's figure JSON (`{"data": [...], "layout": {...}}`)
//! and are rendered in the browser by plotly.js.

use serde::Serialize;

use crate::campaign::{CampaignRecord, Dimension};
use crate::forecast::Forecast;
use crate::stats::{group_mean, group_sum, top_n, Group};
use crate::theme::{Theme, TEALGRN};

/// A Plotly figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// The traces.
    pub data: Vec<Trace>,
    /// Layout and styling.
    pub layout: Layout,
}

impl Figure {
    /// An empty figure with themed backgrounds.
    #[must_use]
    pub fn empty(theme: Theme) -> Self {
        Self {
            data: Vec::new(),
            layout: Layout::themed(theme, None),
        }
    }
}

/// A single trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Bar chart.
    Bar(BarTrace),
    /// Pie chart.
    Pie(PieTrace),
    /// Line/marker chart.
    Scatter(ScatterTrace),
    /// Map colored by value.
    Choropleth(ChoroplethTrace),
}

/// Bar trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    /// Category or value axis, depending on orientation.
    pub x: Vec<serde_json::Value>,
    /// Value or category axis, depending on orientation.
    pub y: Vec<serde_json::Value>,
    /// `"h"` for horizontal bars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<&'static str>,
    /// Bar colors.
    pub marker: Marker,
}

/// Pie trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    /// Slice labels.
    pub labels: Vec<&'static str>,
    /// Slice values.
    pub values: Vec<f64>,
    /// Which text to show on slices.
    pub textinfo: &'static str,
    /// Slice colors.
    pub marker: PieMarker,
}

/// Scatter trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    /// X values.
    pub x: Vec<serde_json::Value>,
    /// Y values.
    pub y: Vec<f64>,
    /// Legend name.
    pub name: &'static str,
    /// Draw mode, e.g. `lines+markers`.
    pub mode: &'static str,
    /// Line styling.
    pub line: Line,
    /// Area fill, e.g. `tonexty`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<&'static str>,
}

/// Choropleth trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    /// Location names.
    pub locations: Vec<&'static str>,
    /// How locations are matched.
    pub locationmode: &'static str,
    /// Values per location.
    pub z: Vec<f64>,
    /// Color scale as `[position, color]` stops.
    pub colorscale: Vec<(f64, &'static str)>,
    /// Color bar title.
    pub colorbar: ColorBar,
}

/// Bar marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Marker {
    /// A single color for all bars.
    Single {
        /// The color.
        color: &'static str,
    },
    /// One color per bar, cycling the palette.
    Palette {
        /// The colors.
        color: Vec<&'static str>,
    },
}

/// Pie marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieMarker {
    /// One color per slice.
    pub colors: Vec<&'static str>,
}

/// Line styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    /// Line color.
    pub color: &'static str,
    /// Dash style, e.g. `dot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<&'static str>,
}

/// Color bar of a choropleth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    /// Title text.
    pub title: Title,
}

/// A title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    /// The text.
    pub text: String,
}

impl Title {
    /// Create a title.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Font settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    /// Font color.
    pub color: &'static str,
}

/// Axis settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title.
    pub title: Title,
}

/// Map settings of a choropleth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geo {
    /// Draw a frame around the map.
    pub showframe: bool,
    /// Draw coastlines.
    pub showcoastlines: bool,
    /// Map projection.
    pub projection: Projection,
    /// Map background.
    pub bgcolor: &'static str,
}

/// A map projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    /// Projection name.
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Chart title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Plot area background.
    pub plot_bgcolor: &'static str,
    /// Paper background.
    pub paper_bgcolor: &'static str,
    /// Font.
    pub font: Font,
    /// X axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    /// Y axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    /// Map settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    /// Fixed height in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Layout {
    /// A layout colored for `theme`.
    #[must_use]
    pub fn themed(theme: Theme, title: Option<&'static str>) -> Self {
        let colors = theme.colors();
        Self {
            title: title.map(Title::new),
            plot_bgcolor: colors.plot_bg,
            paper_bgcolor: colors.paper_bg,
            font: Font { color: colors.text },
            xaxis: None,
            yaxis: None,
            geo: None,
            height: None,
        }
    }
}

fn labels<K: Dimension>(groups: &[Group<K>]) -> Vec<&'static str> {
    groups.iter().map(|g| g.key.label()).collect()
}

fn values<K>(groups: &[Group<K>]) -> Vec<f64> {
    groups.iter().map(|g| g.value).collect()
}

fn json_labels<K: Dimension>(groups: &[Group<K>]) -> Vec<serde_json::Value> {
    groups.iter().map(|g| g.key.label().into()).collect()
}

fn json_values<K>(groups: &[Group<K>]) -> Vec<serde_json::Value> {
    groups.iter().map(|g| g.value.into()).collect()
}

fn palette(len: usize) -> Vec<&'static str> {
    TEALGRN.iter().copied().cycle().take(len).collect()
}

#[allow(clippy::cast_precision_loss)]
fn tealgrn_scale() -> Vec<(f64, &'static str)> {
    let last = (TEALGRN.len() - 1) as f64;
    TEALGRN
        .iter()
        .enumerate()
        .map(|(i, color)| (i as f64 / last, *color))
        .collect()
}

/// Average ROAS per ad type.
#[must_use]
pub fn roas_by_type(records: &[CampaignRecord], theme: Theme) -> Figure {
    let groups = group_mean(records, |r| r.ad_type, |r| r.roas);
    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: json_labels(&groups),
            y: json_values(&groups),
            orientation: None,
            marker: Marker::Palette {
                color: palette(groups.len()),
            },
        })],
        layout: Layout::themed(theme, Some("Average ROAS by Ad Type")),
    }
}

/// Average CTR per device as a pie.
#[must_use]
pub fn ctr_by_device(records: &[CampaignRecord], theme: Theme) -> Figure {
    let groups = group_mean(records, |r| r.device, |r| r.ctr);
    Figure {
        data: vec![Trace::Pie(PieTrace {
            labels: labels(&groups),
            values: values(&groups),
            textinfo: "label+percent",
            marker: PieMarker {
                colors: palette(groups.len()),
            },
        })],
        layout: Layout::themed(theme, Some("CTR by Device")),
    }
}

/// Conversion and bounce rates over the buffered records.
#[must_use]
pub fn metrics_trend(records: &[CampaignRecord], theme: Theme) -> Figure {
    let index: Vec<serde_json::Value> = (0..records.len()).map(Into::into).collect();
    let series = |name, metric: fn(&CampaignRecord) -> f64, color| {
        Trace::Scatter(ScatterTrace {
            x: index.clone(),
            y: records.iter().map(metric).collect(),
            name,
            mode: "lines+markers",
            line: Line { color, dash: None },
            fill: None,
        })
    };

    let mut layout = Layout::themed(theme, Some("Conversion and Bounce Rate Trends"));
    layout.xaxis = Some(Axis {
        title: Title::new("Data Points"),
    });
    layout.yaxis = Some(Axis {
        title: Title::new("Rate (%)"),
    });

    Figure {
        data: vec![
            series("Conversion Rate", |r| r.conversion_rate, TEALGRN[0]),
            series("Bounce Rate", |r| r.bounce_rate, TEALGRN[1]),
        ],
        layout,
    }
}

/// Total clicks per region on a world map.
#[must_use]
pub fn region_map(records: &[CampaignRecord], theme: Theme) -> Figure {
    #[allow(clippy::cast_precision_loss)]
    let groups = group_sum(records, |r| r.region, |r| r.clicks as f64);
    let mut layout = Layout::themed(theme, None);
    layout.geo = Some(Geo {
        showframe: false,
        showcoastlines: true,
        projection: Projection {
            kind: "equirectangular",
        },
        bgcolor: theme.colors().plot_bg,
    });

    Figure {
        data: vec![Trace::Choropleth(ChoroplethTrace {
            locations: labels(&groups),
            locationmode: "country names",
            z: values(&groups),
            colorscale: tealgrn_scale(),
            colorbar: ColorBar {
                title: Title::new("Clicks"),
            },
        })],
        layout,
    }
}

/// The five regions with the most clicks, as horizontal bars.
#[must_use]
pub fn top_countries(records: &[CampaignRecord], theme: Theme) -> Figure {
    #[allow(clippy::cast_precision_loss)]
    let groups = top_n(group_sum(records, |r| r.region, |r| r.clicks as f64), 5);
    let mut layout = Layout::themed(theme, Some("Top 5 Countries by Clicks"));
    layout.height = Some(300);

    Figure {
        data: vec![Trace::Bar(BarTrace {
            x: json_values(&groups),
            y: json_labels(&groups),
            orientation: Some("h"),
            marker: Marker::Single { color: TEALGRN[0] },
        })],
        layout,
    }
}

/// Historical revenue with the forecast and its interval.
#[must_use]
pub fn forecast_plot(forecast: &Forecast, horizon_days: u32, theme: Theme) -> Figure {
    let dates: Vec<serde_json::Value> = forecast
        .points
        .iter()
        .map(|p| p.date.to_string().into())
        .collect();
    let line = |color, dash| Line { color, dash };

    let data = vec![
        Trace::Scatter(ScatterTrace {
            x: forecast
                .history
                .iter()
                .map(|(date, _)| date.to_string().into())
                .collect(),
            y: forecast.history.iter().map(|(_, v)| *v).collect(),
            name: "Historical Revenue",
            mode: "lines+markers",
            line: line("rgba(0,100,80,0.5)", None),
            fill: None,
        }),
        Trace::Scatter(ScatterTrace {
            x: dates.clone(),
            y: forecast.points.iter().map(|p| p.yhat).collect(),
            name: "Forecast",
            mode: "lines",
            line: line("rgba(0,150,0,0.8)", Some("dot")),
            fill: None,
        }),
        Trace::Scatter(ScatterTrace {
            x: dates.clone(),
            y: forecast.points.iter().map(|p| p.yhat_upper).collect(),
            name: "Upper Bound",
            mode: "lines",
            line: line("rgba(0,100,80,0.2)", None),
            fill: None,
        }),
        Trace::Scatter(ScatterTrace {
            x: dates,
            y: forecast.points.iter().map(|p| p.yhat_lower).collect(),
            name: "Lower Bound",
            mode: "lines",
            line: line("rgba(0,100,80,0.2)", None),
            fill: Some("tonexty"),
        }),
    ];

    let mut layout = Layout::themed(theme, None);
    layout.title = Some(Title::new(format!(
        "Revenue Forecast ({horizon_days} Days)"
    )));

    Figure { data, layout }
}
