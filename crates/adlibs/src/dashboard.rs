//! Assembly of the complete dashboard view for one refresh.

use serde::Serialize;

use crate::campaign::CampaignRecord;
use crate::charts::{self, Figure};
use crate::forecast::RevenueForecaster;
use crate::kpi::{KpiCards, KpiTracker};
use crate::stats::KpiValues;
use crate::theme::{CardStyle, SectionStyle, Theme};

/// The six dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardFigures {
    /// Average ROAS by ad type.
    pub roas_by_type: Figure,
    /// CTR by device.
    pub ctr_by_device: Figure,
    /// Conversion and bounce rate trends.
    pub metrics_trend: Figure,
    /// Clicks by region.
    pub region_map: Figure,
    /// Top five countries by clicks.
    pub top_countries: Figure,
    /// Revenue forecast.
    pub forecast: Figure,
}

impl DashboardFigures {
    fn empty(theme: Theme) -> Self {
        Self {
            roas_by_type: Figure::empty(theme),
            ctr_by_device: Figure::empty(theme),
            metrics_trend: Figure::empty(theme),
            region_map: Figure::empty(theme),
            top_countries: Figure::empty(theme),
            forecast: Figure::empty(theme),
        }
    }
}

/// Inline styles of the page sections and cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStyles {
    /// Header section.
    pub header: SectionStyle,
    /// Main container.
    pub container: SectionStyle,
    /// The five KPI cards, in card order.
    pub cards: [CardStyle; 5],
}

impl DashboardStyles {
    /// Styles for a theme.
    #[must_use]
    pub fn for_theme(theme: Theme) -> Self {
        Self {
            header: SectionStyle::for_theme(theme),
            container: SectionStyle::for_theme(theme),
            cards: std::array::from_fn(|_| CardStyle::default()),
        }
    }
}

/// Everything the browser needs to draw one refresh of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Theme the view was rendered for.
    pub theme: Theme,
    /// Records the view was computed from.
    pub record_count: usize,
    /// KPI cards.
    pub kpis: KpiCards,
    /// Charts.
    pub figures: DashboardFigures,
    /// Section and card styles.
    pub styles: DashboardStyles,
}

impl DashboardView {
    /// Render a view of `records`.
    ///
    /// When a tracker is given, KPI trends compare against the values it last
    /// saw and the tracker is updated. An empty snapshot leaves it untouched.
    #[must_use]
    pub fn render(
        records: &[CampaignRecord],
        theme: Theme,
        tracker: Option<&mut KpiTracker>,
        forecaster: &RevenueForecaster,
    ) -> Self {
        let styles = DashboardStyles::for_theme(theme);

        let Some(current) = KpiValues::compute(records) else {
            return Self {
                theme,
                record_count: 0,
                kpis: KpiCards::empty(theme),
                figures: DashboardFigures::empty(theme),
                styles,
            };
        };

        let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();
        let forecast = forecaster.forecast(&revenue);

        Self {
            theme,
            record_count: records.len(),
            kpis: KpiCards::build(&current, tracker, theme),
            figures: DashboardFigures {
                roas_by_type: charts::roas_by_type(records, theme),
                ctr_by_device: charts::ctr_by_device(records, theme),
                metrics_trend: charts::metrics_trend(records, theme),
                region_map: charts::region_map(records, theme),
                top_countries: charts::top_countries(records, theme),
                forecast: charts::forecast_plot(&forecast, forecaster.horizon_days(), theme),
            },
            styles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::generator::CampaignGenerator;
    use crate::kpi::Trend;

    fn forecaster() -> RevenueForecaster {
        RevenueForecaster::from_config(&ForecastConfig::default())
    }

    #[test]
    fn test_empty_view() {
        let mut tracker = KpiTracker::new();
        let view = DashboardView::render(&[], Theme::Dark, Some(&mut tracker), &forecaster());

        assert_eq!(view.record_count, 0);
        assert_eq!(view.kpis.peak, "N/A");
        assert!(view.figures.forecast.data.is_empty());
        assert_eq!(view.styles.header.background_color, "#1c1c1c");
        assert!(tracker.previous().is_none());
    }

    #[test]
    fn test_view_with_records() {
        let records = CampaignGenerator::new(Some(21)).generate_batch(20);
        let view = DashboardView::render(&records, Theme::Light, None, &forecaster());

        assert_eq!(view.record_count, 20);
        assert!(view.kpis.rpc.text.starts_with('$'));
        assert!(view.kpis.ctr.text.ends_with('%'));
        assert_ne!(view.kpis.peak, "N/A");
        assert_eq!(view.figures.metrics_trend.data.len(), 2);
        assert_eq!(view.figures.forecast.data.len(), 4);
        assert_eq!(view.styles.cards.len(), 5);
    }

    #[test]
    fn test_view_updates_tracker() {
        let mut generator = CampaignGenerator::new(Some(22));
        let mut records = generator.generate_batch(10);
        let mut tracker = KpiTracker::new();

        let first = DashboardView::render(&records, Theme::Light, Some(&mut tracker), &forecaster());
        assert_eq!(first.kpis.rpc.trend, Trend::Flat);
        assert!(tracker.previous().is_some());

        records.extend(generator.generate_batch(10));
        let second =
            DashboardView::render(&records, Theme::Light, Some(&mut tracker), &forecaster());
        assert_ne!(second.kpis.rpc.trend, Trend::Flat);
    }

    #[test]
    fn test_view_serializes() {
        let records = CampaignGenerator::new(Some(23)).generate_batch(5);
        let view = DashboardView::render(&records, Theme::Dark, None, &forecaster());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["theme"], "dark");
        assert_eq!(json["styles"]["container"]["color"], "white");
        assert_eq!(json["figures"]["roas_by_type"]["data"][0]["type"], "bar");
        assert_eq!(json["styles"]["cards"][0]["background"], "#44a1a0");
    }
}
