//! KPI card formatting and trend tracking.

use serde::Serialize;

use crate::stats::KpiValues;
use crate::theme::Theme;

/// Arrow color when a KPI moved in the favorable direction.
pub const FAVORABLE_COLOR: &str = "#34623f";

/// Arrow color when a KPI moved in the unfavorable direction.
pub const UNFAVORABLE_COLOR: &str = "#623440";

/// Direction of a KPI relative to the previous refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// No previous value to compare against.
    Flat,
    /// The value increased.
    Up,
    /// The value did not increase.
    Down,
}

impl Trend {
    /// The arrow glyph shown after the value.
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Flat => "",
            Self::Up => " ▲",
            Self::Down => " ▼",
        }
    }
}

/// Unit decoration of a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A currency amount, prefixed with `$`. Increases are unfavorable.
    Dollars,
    /// A percentage, suffixed with `%`. Increases are favorable.
    Percent,
}

impl Unit {
    fn prefix(self) -> &'static str {
        match self {
            Self::Dollars => "$",
            Self::Percent => "",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Dollars => "",
            Self::Percent => "%",
        }
    }
}

/// A rendered KPI card value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiDisplay {
    /// The formatted value, e.g. `$1,234.50`.
    pub text: String,
    /// Trend relative to the previous refresh.
    pub trend: Trend,
    /// The arrow glyph (empty for [`Trend::Flat`]).
    pub arrow: &'static str,
    /// Color of the value text.
    pub color: &'static str,
    /// Color of the arrow.
    pub arrow_color: &'static str,
}

impl KpiDisplay {
    /// A placeholder shown before any data exists.
    #[must_use]
    pub fn placeholder(text: &str, theme: Theme) -> Self {
        let color = theme.colors().text;
        Self {
            text: text.to_string(),
            trend: Trend::Flat,
            arrow: Trend::Flat.arrow(),
            color,
            arrow_color: color,
        }
    }
}

/// Format a number with thousands separators and two decimals.
#[must_use]
pub fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Format a KPI against its previous value.
///
/// Without a previous value (or with a previous value of 0) no arrow is
/// shown. Otherwise an increase shows `▲` and anything else `▼`, colored by
/// whether that direction is favorable for the unit.
#[must_use]
pub fn format_kpi(current: f64, previous: Option<f64>, unit: Unit, theme: Theme) -> KpiDisplay {
    let text_color = theme.colors().text;

    let trend = match previous {
        Some(previous) if previous != 0.0 => {
            let pct_change = (current - previous) / previous * 100.0;
            if pct_change > 0.0 {
                Trend::Up
            } else {
                Trend::Down
            }
        }
        _ => Trend::Flat,
    };

    let arrow_color = match (trend, unit) {
        (Trend::Flat, _) => text_color,
        (Trend::Up, Unit::Dollars) | (Trend::Down, Unit::Percent) => UNFAVORABLE_COLOR,
        (Trend::Down, Unit::Dollars) | (Trend::Up, Unit::Percent) => FAVORABLE_COLOR,
    };

    KpiDisplay {
        text: format!(
            "{}{}{}",
            unit.prefix(),
            format_number(current),
            unit.suffix()
        ),
        trend,
        arrow: trend.arrow(),
        color: text_color,
        arrow_color,
    }
}

/// Remembers the KPIs last shown to one viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiTracker {
    previous: Option<KpiValues>,
}

impl KpiTracker {
    /// Create a tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The KPIs last recorded.
    #[must_use]
    pub fn previous(&self) -> Option<&KpiValues> {
        self.previous.as_ref()
    }

    /// Record the KPIs just shown, returning the ones shown before.
    pub fn record(&mut self, current: KpiValues) -> Option<KpiValues> {
        self.previous.replace(current)
    }
}

/// The five KPI cards of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCards {
    /// Average revenue per click.
    pub rpc: KpiDisplay,
    /// Average click-through rate.
    pub ctr: KpiDisplay,
    /// Average cost per click.
    pub cpc: KpiDisplay,
    /// Most common period, or `N/A`.
    pub peak: String,
    /// Average cost per acquisition.
    pub cpa: KpiDisplay,
}

impl KpiCards {
    /// Cards shown while the buffer is empty.
    #[must_use]
    pub fn empty(theme: Theme) -> Self {
        Self {
            rpc: KpiDisplay::placeholder("$0", theme),
            ctr: KpiDisplay::placeholder("0%", theme),
            cpc: KpiDisplay::placeholder("$0", theme),
            peak: "N/A".to_string(),
            cpa: KpiDisplay::placeholder("$0", theme),
        }
    }

    /// Build cards for `current`, comparing against and then updating the
    /// tracker when one is given.
    #[must_use]
    pub fn build(current: &KpiValues, tracker: Option<&mut KpiTracker>, theme: Theme) -> Self {
        let previous = tracker.and_then(|t| t.record(*current));
        let prev = |f: fn(&KpiValues) -> f64| previous.as_ref().map(f);

        Self {
            rpc: format_kpi(current.avg_rpc, prev(|k| k.avg_rpc), Unit::Dollars, theme),
            ctr: format_kpi(current.avg_ctr, prev(|k| k.avg_ctr), Unit::Percent, theme),
            cpc: format_kpi(current.avg_cpc, prev(|k| k.avg_cpc), Unit::Dollars, theme),
            peak: current.peak_period.to_string(),
            cpa: format_kpi(current.avg_cpa, prev(|k| k.avg_cpa), Unit::Dollars, theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{DayPart, Period, Weekday};

    fn kpis(value: f64) -> KpiValues {
        KpiValues {
            avg_rpc: value,
            avg_ctr: value,
            avg_cpc: value,
            avg_cpa: value,
            peak_period: Period {
                day: Weekday::Saturday,
                part: DayPart::Afternoon,
            },
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0.00");
        assert_eq!(format_number(4.2), "4.20");
        assert_eq!(format_number(999.999), "1,000.00");
        assert_eq!(format_number(1_234_567.891), "1,234,567.89");
        assert_eq!(format_number(-1234.5), "-1,234.50");
        assert_eq!(format_number(-0.001), "0.00");
    }

    #[test]
    fn test_format_kpi_percentage_matches_input() {
        let display = format_kpi(12.34, None, Unit::Percent, Theme::Light);
        assert_eq!(display.text, "12.34%");
        assert_eq!(display.trend, Trend::Flat);
        assert_eq!(display.arrow, "");
        assert_eq!(display.arrow_color, "black");
    }

    #[test]
    fn test_format_kpi_dollar_increase_is_unfavorable() {
        let display = format_kpi(2.5, Some(2.0), Unit::Dollars, Theme::Dark);
        assert_eq!(display.text, "$2.50");
        assert_eq!(display.trend, Trend::Up);
        assert_eq!(display.arrow, " ▲");
        assert_eq!(display.arrow_color, UNFAVORABLE_COLOR);
        assert_eq!(display.color, "white");
    }

    #[test]
    fn test_format_kpi_percent_increase_is_favorable() {
        let display = format_kpi(5.0, Some(4.0), Unit::Percent, Theme::Light);
        assert_eq!(display.trend, Trend::Up);
        assert_eq!(display.arrow_color, FAVORABLE_COLOR);

        let display = format_kpi(3.0, Some(4.0), Unit::Percent, Theme::Light);
        assert_eq!(display.trend, Trend::Down);
        assert_eq!(display.arrow, " ▼");
        assert_eq!(display.arrow_color, UNFAVORABLE_COLOR);
    }

    #[test]
    fn test_format_kpi_zero_previous_has_no_arrow() {
        let display = format_kpi(3.0, Some(0.0), Unit::Dollars, Theme::Light);
        assert_eq!(display.trend, Trend::Flat);
    }

    #[test]
    fn test_format_kpi_unchanged_is_down() {
        let display = format_kpi(3.0, Some(3.0), Unit::Dollars, Theme::Light);
        assert_eq!(display.trend, Trend::Down);
        assert_eq!(display.arrow_color, FAVORABLE_COLOR);
    }

    #[test]
    fn test_tracker_records_previous() {
        let mut tracker = KpiTracker::new();
        assert!(tracker.previous().is_none());

        assert!(tracker.record(kpis(1.0)).is_none());
        let before = tracker.record(kpis(2.0)).unwrap();
        assert!((before.avg_rpc - 1.0).abs() < f64::EPSILON);
        assert!((tracker.previous().unwrap().avg_rpc - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cards_compare_with_tracker() {
        let mut tracker = KpiTracker::new();

        let first = KpiCards::build(&kpis(1.0), Some(&mut tracker), Theme::Light);
        assert_eq!(first.rpc.trend, Trend::Flat);
        assert_eq!(first.peak, "Saturday Afternoon");

        let second = KpiCards::build(&kpis(2.0), Some(&mut tracker), Theme::Light);
        assert_eq!(second.rpc.trend, Trend::Up);
        assert_eq!(second.ctr.trend, Trend::Up);
        assert_eq!(second.rpc.arrow_color, UNFAVORABLE_COLOR);
        assert_eq!(second.ctr.arrow_color, FAVORABLE_COLOR);
    }

    #[test]
    fn test_cards_without_tracker_are_flat() {
        let cards = KpiCards::build(&kpis(1.0), None, Theme::Dark);
        assert_eq!(cards.cpa.trend, Trend::Flat);
        assert_eq!(cards.cpa.text, "$1.00");
    }

    #[test]
    fn test_empty_cards() {
        let cards = KpiCards::empty(Theme::Light);
        assert_eq!(cards.rpc.text, "$0");
        assert_eq!(cards.ctr.text, "0%");
        assert_eq!(cards.cpc.text, "$0");
        assert_eq!(cards.peak, "N/A");
        assert_eq!(cards.cpa.text, "$0");
    }
}
