//! Descriptive statistics over a snapshot of campaign records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::campaign::{round2, CampaignRecord, Dimension, Period};

/// Arithmetic mean, or 0 for no values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Mean of one metric across records.
#[must_use]
pub fn mean_of(records: &[CampaignRecord], metric: impl Fn(&CampaignRecord) -> f64) -> f64 {
    mean(records.iter().map(metric))
}

/// Sum of one metric across records.
#[must_use]
pub fn sum_of(records: &[CampaignRecord], metric: impl Fn(&CampaignRecord) -> f64) -> f64 {
    records.iter().map(metric).sum()
}

/// Sum of one integer metric across records.
#[must_use]
pub fn total_of(records: &[CampaignRecord], metric: impl Fn(&CampaignRecord) -> u64) -> u64 {
    records.iter().map(metric).sum()
}

/// The most frequent period.
///
/// Ties go to the lexicographically smallest label.
#[must_use]
pub fn peak_period(records: &[CampaignRecord]) -> Option<Period> {
    let mut counts: BTreeMap<String, (Period, usize)> = BTreeMap::new();
    for record in records {
        counts
            .entry(record.period.to_string())
            .or_insert((record.period, 0))
            .1 += 1;
    }

    // max_by_key returns the last maximum; iterate in reverse so the
    // smallest label wins ties.
    counts
        .into_values()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(period, _)| period)
}

/// An aggregated value for one key of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Group<K> {
    /// The dimension value.
    pub key: K,
    /// The aggregate.
    pub value: f64,
}

fn grouped<K: Dimension>(
    records: &[CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
    metric: impl Fn(&CampaignRecord) -> f64,
) -> BTreeMap<&'static str, (K, Vec<f64>)> {
    let mut groups: BTreeMap<&'static str, (K, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let k = key(record);
        groups
            .entry(k.label())
            .or_insert_with(|| (k, Vec::new()))
            .1
            .push(metric(record));
    }
    groups
}

/// Mean of a metric per key, sorted by key label. Keys with no records are
/// omitted.
#[must_use]
pub fn group_mean<K: Dimension>(
    records: &[CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
    metric: impl Fn(&CampaignRecord) -> f64,
) -> Vec<Group<K>> {
    grouped(records, key, metric)
        .into_values()
        .map(|(key, values)| Group {
            key,
            value: mean(values),
        })
        .collect()
}

/// Sum of a metric per key, sorted by key label. Keys with no records are
/// omitted.
#[must_use]
pub fn group_sum<K: Dimension>(
    records: &[CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
    metric: impl Fn(&CampaignRecord) -> f64,
) -> Vec<Group<K>> {
    grouped(records, key, metric)
        .into_values()
        .map(|(key, values)| Group {
            key,
            value: values.into_iter().sum(),
        })
        .collect()
}

/// The `n` largest groups, descending. Equal values keep their input order.
#[must_use]
pub fn top_n<K>(mut groups: Vec<Group<K>>, n: usize) -> Vec<Group<K>> {
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups.truncate(n);
    groups
}

/// Headline KPIs shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiValues {
    /// Average revenue per click.
    pub avg_rpc: f64,
    /// Average click-through rate in percent.
    pub avg_ctr: f64,
    /// Average cost per click.
    pub avg_cpc: f64,
    /// Average cost per acquisition.
    pub avg_cpa: f64,
    /// Most common period.
    pub peak_period: Period,
}

impl KpiValues {
    /// Compute KPIs, each rounded to two decimals. `None` when empty.
    #[must_use]
    pub fn compute(records: &[CampaignRecord]) -> Option<Self> {
        let peak_period = peak_period(records)?;
        Some(Self {
            avg_rpc: round2(mean_of(records, |r| r.rpc)),
            avg_ctr: round2(mean_of(records, |r| r.ctr)),
            avg_cpc: round2(mean_of(records, |r| r.cpc)),
            avg_cpa: round2(mean_of(records, |r| r.cpa)),
            peak_period,
        })
    }
}

/// Summary figures printed in the PDF report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Average revenue per record.
    pub avg_revenue: f64,
    /// Average click-through rate in percent.
    pub avg_ctr: f64,
    /// Average cost per click.
    pub avg_cpc: f64,
    /// Average return on ad spend.
    pub avg_roas: f64,
    /// Total conversions.
    pub total_conversions: u64,
    /// Total impressions.
    pub total_impressions: u64,
    /// Total clicks.
    pub total_clicks: u64,
    /// Total spend.
    pub total_spend: f64,
}

impl ReportSummary {
    /// Compute the summary. `None` when empty.
    #[must_use]
    pub fn compute(records: &[CampaignRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self {
            avg_revenue: mean_of(records, |r| r.revenue),
            avg_ctr: mean_of(records, |r| r.ctr),
            avg_cpc: mean_of(records, |r| r.cpc),
            avg_roas: mean_of(records, |r| r.roas),
            total_conversions: total_of(records, |r| r.conversions),
            total_impressions: total_of(records, |r| r.impressions),
            total_clicks: total_of(records, |r| r.clicks),
            total_spend: sum_of(records, |r| r.spend),
        })
    }

    /// Label/value rows in report order.
    #[must_use]
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Average Revenue", format!("${:.2}", self.avg_revenue)),
            ("Average CTR", format!("{:.2}%", self.avg_ctr)),
            ("Average CPC", format!("${:.2}", self.avg_cpc)),
            ("Average ROAS", format!("{:.2}", self.avg_roas)),
            ("Total Conversions", self.total_conversions.to_string()),
            ("Total Impressions", self.total_impressions.to_string()),
            ("Total Clicks", self.total_clicks.to_string()),
            ("Total Spend", format!("${:.2}", self.total_spend)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::tests::sample_record;
    use crate::campaign::{AdType, DayPart, Device, Region, Weekday};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_sum() {
        assert!(close(mean([1.0, 2.0, 3.0]), 2.0));
        assert!(close(mean(Vec::<f64>::new()), 0.0));

        let records = vec![
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 100, 50.0),
            sample_record(AdType::Video, Region::Canada, Device::Mobile, 300, 150.0),
        ];
        assert!(close(mean_of(&records, |r| r.revenue), 100.0));
        assert!(close(sum_of(&records, |r| r.spend), 400.0));
        assert_eq!(total_of(&records, |r| r.clicks), 400);
    }

    #[test]
    fn test_peak_period_picks_most_frequent() {
        let mut records: Vec<_> = (0..3)
            .map(|_| sample_record(AdType::Search, Region::Canada, Device::Mobile, 100, 1.0))
            .collect();
        records[0].period = Period {
            day: Weekday::Friday,
            part: DayPart::Night,
        };

        assert_eq!(
            peak_period(&records),
            Some(Period {
                day: Weekday::Monday,
                part: DayPart::Morning,
            })
        );
    }

    #[test]
    fn test_peak_period_tie_goes_to_smallest_label() {
        let mut records: Vec<_> = (0..2)
            .map(|_| sample_record(AdType::Search, Region::Canada, Device::Mobile, 100, 1.0))
            .collect();
        records[0].period = Period {
            day: Weekday::Tuesday,
            part: DayPart::Evening,
        };
        records[1].period = Period {
            day: Weekday::Friday,
            part: DayPart::Night,
        };

        // "Friday Night" < "Tuesday Evening"
        assert_eq!(peak_period(&records), Some(records[1].period));
    }

    #[test]
    fn test_peak_period_empty() {
        assert_eq!(peak_period(&[]), None);
    }

    #[test]
    fn test_group_mean_sorted_by_label() {
        let records = vec![
            sample_record(AdType::Video, Region::Canada, Device::Mobile, 100, 100.0),
            sample_record(AdType::Email, Region::Canada, Device::Mobile, 100, 300.0),
            sample_record(AdType::Video, Region::Canada, Device::Mobile, 100, 300.0),
        ];

        let groups = group_mean(&records, |r| r.ad_type, |r| r.revenue);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, AdType::Email);
        assert!(close(groups[0].value, 300.0));
        assert_eq!(groups[1].key, AdType::Video);
        assert!(close(groups[1].value, 200.0));
    }

    #[test]
    fn test_group_sum_and_top_n() {
        let records = vec![
            sample_record(AdType::Search, Region::Japan, Device::Mobile, 50, 1.0),
            sample_record(AdType::Search, Region::Brazil, Device::Mobile, 200, 1.0),
            sample_record(AdType::Search, Region::Japan, Device::Mobile, 100, 1.0),
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 150, 1.0),
        ];

        let sums = group_sum(&records, |r| r.region, |r| r.clicks as f64);
        assert_eq!(sums.len(), 3);

        let top = top_n(sums, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, Region::Brazil);
        assert_eq!(top[1].key, Region::Canada);
    }

    #[test]
    fn test_top_n_ties_keep_order() {
        let groups = vec![
            Group {
                key: Region::Canada,
                value: 10.0,
            },
            Group {
                key: Region::Italy,
                value: 10.0,
            },
        ];
        let top = top_n(groups, 5);
        assert_eq!(top[0].key, Region::Canada);
        assert_eq!(top[1].key, Region::Italy);
    }

    #[test]
    fn test_kpis_empty_is_none() {
        assert!(KpiValues::compute(&[]).is_none());
        assert!(ReportSummary::compute(&[]).is_none());
    }

    #[test]
    fn test_kpis_rounded() {
        let records = vec![
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 300, 100.0),
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 300, 200.0),
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 300, 200.0),
        ];
        let kpis = KpiValues::compute(&records).unwrap();

        // rpc: 0.33, 0.67, 0.67
        assert!(close(kpis.avg_rpc, 0.56));
        assert!(close(kpis.avg_ctr, 3.0));
        assert!(close(kpis.avg_cpc, 1.0));
        assert!(close(kpis.avg_cpa, 60.0));
    }

    #[test]
    fn test_report_summary_rows() {
        let records = vec![
            sample_record(AdType::Search, Region::Canada, Device::Mobile, 100, 50.0),
            sample_record(AdType::Video, Region::Canada, Device::Tablet, 300, 150.0),
        ];
        let summary = ReportSummary::compute(&records).unwrap();
        let rows = summary.rows();

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], ("Average Revenue", "$100.00".to_string()));
        assert_eq!(rows[1], ("Average CTR", "2.00%".to_string()));
        assert_eq!(rows[4], ("Total Conversions", "10".to_string()));
        assert_eq!(rows[5], ("Total Impressions", "20000".to_string()));
        assert_eq!(rows[6], ("Total Clicks", "400".to_string()));
        assert_eq!(rows[7], ("Total Spend", "$400.00".to_string()));
    }
}
