//! Revenue forecasting.
//!
//! Historical values are laid out on consecutive days from a fixed start
//! date. The model is a linear trend plus an optional day-of-week seasonal
//! component, fitted by backfitting the two parts against each other.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::config::ForecastConfig;
use crate::stats::mean;

/// z-score of the central 80% interval.
const Z_80: f64 = 1.281_551_565_545;

/// Minimum history before a weekly component is fitted.
const MIN_SEASONAL_POINTS: usize = 14;

/// Backfitting rounds between trend and seasonality.
const BACKFIT_ROUNDS: usize = 25;

/// One forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// The day.
    pub date: NaiveDate,
    /// Predicted value.
    pub yhat: f64,
    /// Lower bound of the 80% interval.
    pub yhat_lower: f64,
    /// Upper bound of the 80% interval.
    pub yhat_upper: f64,
}

/// A fitted forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// The history on its assigned dates.
    pub history: Vec<(NaiveDate, f64)>,
    /// Predictions over the history and the horizon.
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Check if there was nothing to forecast.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Fits and extrapolates a revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueForecaster {
    start_date: NaiveDate,
    horizon_days: u32,
}

struct Fit {
    intercept: f64,
    slope: f64,
    weekly: Option<[f64; 7]>,
    sigma: f64,
}

impl Fit {
    #[allow(clippy::cast_precision_loss)]
    fn predict(&self, t: usize, date: NaiveDate) -> f64 {
        let seasonal = self
            .weekly
            .map_or(0.0, |w| w[date.weekday().num_days_from_monday() as usize]);
        self.intercept + self.slope * t as f64 + seasonal
    }
}

impl RevenueForecaster {
    /// Create a forecaster.
    #[must_use]
    pub fn new(start_date: NaiveDate, horizon_days: u32) -> Self {
        Self {
            start_date,
            horizon_days,
        }
    }

    /// Create a forecaster from configuration.
    #[must_use]
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.start_date, config.horizon_days)
    }

    /// Days forecast beyond the history.
    #[must_use]
    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// The date assigned to the `index`th value.
    #[must_use]
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start_date
            .checked_add_days(Days::new(index as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Fit `values` and predict through the horizon.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn forecast(&self, values: &[f64]) -> Forecast {
        let n = values.len();
        if n == 0 {
            return Forecast {
                history: Vec::new(),
                points: Vec::new(),
            };
        }

        let dates: Vec<NaiveDate> = (0..n).map(|i| self.date_at(i)).collect();
        let fit = self.fit(values, &dates);
        let last = n - 1;

        let points = (0..n + self.horizon_days as usize)
            .map(|t| {
                let date = self.date_at(t);
                let yhat = fit.predict(t, date);
                let ahead = t.saturating_sub(last) as f64;
                let half_width = Z_80 * fit.sigma * (1.0 + ahead / n as f64).sqrt();
                ForecastPoint {
                    date,
                    yhat,
                    yhat_lower: yhat - half_width,
                    yhat_upper: yhat + half_width,
                }
            })
            .collect();

        Forecast {
            history: dates.into_iter().zip(values.iter().copied()).collect(),
            points,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(&self, values: &[f64], dates: &[NaiveDate]) -> Fit {
        let n = values.len();
        let seasonal = n >= MIN_SEASONAL_POINTS;
        let weekday = |i: usize| dates[i].weekday().num_days_from_monday() as usize;

        let mut weekly = [0.0; 7];
        let (mut intercept, mut slope) = linear_fit(values);

        if seasonal {
            for _ in 0..BACKFIT_ROUNDS {
                let mut sums = [0.0; 7];
                let mut counts = [0usize; 7];
                for (i, y) in values.iter().enumerate() {
                    let residual = y - (intercept + slope * i as f64);
                    sums[weekday(i)] += residual;
                    counts[weekday(i)] += 1;
                }
                for d in 0..7 {
                    weekly[d] = if counts[d] > 0 {
                        sums[d] / counts[d] as f64
                    } else {
                        0.0
                    };
                }
                let center = mean((0..7).filter(|d| counts[*d] > 0).map(|d| weekly[d]));
                for value in &mut weekly {
                    *value -= center;
                }

                let deseasoned: Vec<f64> = values
                    .iter()
                    .enumerate()
                    .map(|(i, y)| y - weekly[weekday(i)])
                    .collect();
                (intercept, slope) = linear_fit(&deseasoned);
            }
        }

        let fit = Fit {
            intercept,
            slope,
            weekly: seasonal.then_some(weekly),
            sigma: 0.0,
        };

        let params = if seasonal { 8 } else { 2 };
        let sse: f64 = values
            .iter()
            .enumerate()
            .map(|(i, y)| (y - fit.predict(i, dates[i])).powi(2))
            .sum();
        let dof = n.saturating_sub(params).max(1);

        Fit {
            sigma: (sse / dof as f64).sqrt(),
            ..fit
        }
    }
}

/// Ordinary least squares of `values` against their index.
#[allow(clippy::cast_precision_loss)]
fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n < 2 {
        return (values.first().copied().unwrap_or(0.0), 0.0);
    }

    let t_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values.iter().copied());
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dt = i as f64 - t_mean;
        sxy += dt * (y - y_mean);
        sxx += dt * dt;
    }
    let slope = sxy / sxx;
    (y_mean - slope * t_mean, slope)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecaster() -> RevenueForecaster {
        RevenueForecaster::from_config(&ForecastConfig::default())
    }

    #[test]
    fn test_empty_history() {
        let forecast = forecaster().forecast(&[]);
        assert!(forecast.is_empty());
        assert!(forecast.history.is_empty());
    }

    #[test]
    fn test_single_point_is_flat() {
        let forecast = forecaster().forecast(&[42.0]);

        assert_eq!(forecast.points.len(), 31);
        for point in &forecast.points {
            assert!((point.yhat - 42.0).abs() < 1e-9);
            assert!((point.yhat_upper - point.yhat_lower).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dates_start_at_configured_day() {
        let forecast = forecaster().forecast(&[1.0, 2.0, 3.0]);

        assert_eq!(
            forecast.history[0].0,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(forecast.points.len(), 33);
        assert_eq!(
            forecast.points.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()
        );
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let values: Vec<f64> = (0..20).map(|t| 10.0 + 2.0 * f64::from(t)).collect();
        let forecast = forecaster().forecast(&values);

        let last = forecast.points.last().unwrap();
        // t = 49
        assert!((last.yhat - 108.0).abs() < 1e-6);
        assert!(last.yhat_upper - last.yhat_lower < 1e-6);
    }

    #[test]
    fn test_weekly_pattern_is_learned() {
        // Saturdays (2024-01-06 onwards) earn 50 more.
        let f = forecaster();
        let values: Vec<f64> = (0..28)
            .map(|i| {
                if f.date_at(i).weekday() == chrono::Weekday::Sat {
                    150.0
                } else {
                    100.0
                }
            })
            .collect();
        let forecast = f.forecast(&values);

        for point in &forecast.points[28..] {
            let expected = if point.date.weekday() == chrono::Weekday::Sat {
                150.0
            } else {
                100.0
            };
            assert!(
                (point.yhat - expected).abs() < 1.0,
                "{} predicted {}",
                point.date,
                point.yhat
            );
        }
    }

    #[test]
    fn test_interval_widens_beyond_history() {
        let values = [10.0, 14.0, 9.0, 13.0, 11.0, 15.0, 8.0, 12.0];
        let forecast = forecaster().forecast(&values);

        let width = |p: &ForecastPoint| p.yhat_upper - p.yhat_lower;
        let at_history_end = width(&forecast.points[7]);
        let at_horizon_end = width(forecast.points.last().unwrap());
        assert!(at_history_end > 0.0);
        assert!(at_horizon_end > at_history_end);
        for point in &forecast.points {
            assert!(point.yhat_lower <= point.yhat && point.yhat <= point.yhat_upper);
        }
    }

    #[test]
    fn test_linear_fit() {
        let (a, b) = linear_fit(&[1.0, 3.0, 5.0]);
        assert!((a - 1.0).abs() < 1e-9);
        assert!((b - 2.0).abs() < 1e-9);
        assert_eq!(linear_fit(&[]), (0.0, 0.0));
    }
}
