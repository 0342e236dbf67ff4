//! Core campaign types for adlibs.
//!
//! This module defines the campaign-performance record and the dimensions
//! (ad type, region, device, period) it is grouped by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dimension with a fixed, human-readable set of values.
pub trait Dimension: Copy + Ord + 'static {
    /// Every value of the dimension, in declaration order.
    const ALL: &'static [Self];

    /// The display label.
    fn label(self) -> &'static str;
}

macro_rules! dimension {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Dimension for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.label())
            }
        }
    };
}

dimension! {
    /// The advertising channel.
    pub enum AdType {
        Search => "Search",
        Display => "Display",
        Video => "Video",
        SocialMedia => "Social Media",
        Email => "Email",
    }
}

dimension! {
    /// The country a campaign ran in.
    pub enum Region {
        UnitedStates => "United States",
        Canada => "Canada",
        UnitedKingdom => "United Kingdom",
        France => "France",
        Germany => "Germany",
        Spain => "Spain",
        Italy => "Italy",
        China => "China",
        Japan => "Japan",
        India => "India",
        Australia => "Australia",
        Brazil => "Brazil",
        SouthAfrica => "South Africa",
        Russia => "Russia",
        Mexico => "Mexico",
    }
}

dimension! {
    /// The device class the ad was served to.
    pub enum Device {
        Mobile => "Mobile",
        Desktop => "Desktop",
        Tablet => "Tablet",
    }
}

dimension! {
    /// Day of the week.
    pub enum Weekday {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

dimension! {
    /// Part of the day.
    pub enum DayPart {
        Morning => "Morning",
        Afternoon => "Afternoon",
        Evening => "Evening",
        Night => "Night",
    }
}

/// A weekday and part of the day, e.g. "Monday Morning".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    /// Day of the week.
    pub day: Weekday,
    /// Part of the day.
    pub part: DayPart,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.day, self.part)
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        let (day, part) = label
            .split_once(' ')
            .ok_or_else(|| serde::de::Error::custom(format!("invalid period '{label}'")))?;
        let day = Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.label() == day)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid weekday '{day}'")))?;
        let part = DayPart::ALL
            .iter()
            .copied()
            .find(|p| p.label() == part)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid day part '{part}'")))?;
        Ok(Self { day, part })
    }
}

/// Raw, independently drawn inputs of a campaign record.
///
/// Everything else on [`CampaignRecord`] is derived from these.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCampaign {
    /// Campaign identity.
    pub id: Uuid,
    /// Advertising channel.
    pub ad_type: AdType,
    /// Country.
    pub region: Region,
    /// Device class.
    pub device: Device,
    /// Times the ad was shown.
    pub impressions: u64,
    /// Times the ad was clicked.
    pub clicks: u64,
    /// Cost per click.
    pub cpc: f64,
    /// Conversions attributed to the ad.
    pub conversions: u64,
    /// Revenue from the conversions.
    pub revenue: f64,
    /// Share of sessions that bounced, in percent.
    pub bounce_rate: f64,
    /// When the campaign ran.
    pub period: Period,
}

/// A campaign-performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// First segment of the campaign UUID.
    pub campaign_id: String,
    /// Full campaign UUID.
    pub full_campaign_id: Uuid,
    /// Advertising channel.
    pub ad_type: AdType,
    /// Country.
    pub region: Region,
    /// Device class.
    pub device: Device,
    /// Times the ad was shown.
    pub impressions: u64,
    /// Times the ad was clicked.
    pub clicks: u64,
    /// Click-through rate in percent.
    pub ctr: f64,
    /// Cost per click.
    pub cpc: f64,
    /// Conversions attributed to the ad.
    pub conversions: u64,
    /// Revenue from the conversions.
    pub revenue: f64,
    /// Total spend (`clicks * cpc`).
    pub spend: f64,
    /// Return on ad spend.
    pub roas: f64,
    /// Revenue per click.
    pub rpc: f64,
    /// Cost per acquisition.
    pub cpa: f64,
    /// Conversions per click in percent.
    pub conversion_rate: f64,
    /// Share of sessions that bounced, in percent.
    pub bounce_rate: f64,
    /// Return on investment in percent.
    pub roi: f64,
    /// When the campaign ran.
    pub period: Period,
    /// When this record was generated.
    pub generated_at: DateTime<Utc>,
}

impl CampaignRecord {
    /// Build a record from raw inputs, computing the derived ratios.
    ///
    /// Every derived value is rounded to two decimals. A ratio with a zero
    /// denominator is 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_raw(raw: RawCampaign) -> Self {
        let impressions = raw.impressions as f64;
        let clicks = raw.clicks as f64;
        let conversions = raw.conversions as f64;
        let spend = round2(clicks * raw.cpc);

        let full = raw.id.to_string();
        let campaign_id = full.split('-').next().unwrap_or(&full).to_string();

        Self {
            campaign_id,
            full_campaign_id: raw.id,
            ad_type: raw.ad_type,
            region: raw.region,
            device: raw.device,
            impressions: raw.impressions,
            clicks: raw.clicks,
            ctr: round2(ratio(clicks, impressions) * 100.0),
            cpc: raw.cpc,
            conversions: raw.conversions,
            revenue: raw.revenue,
            spend,
            roas: round2(ratio(raw.revenue, spend)),
            rpc: round2(ratio(raw.revenue, clicks)),
            cpa: round2(ratio(spend, conversions)),
            conversion_rate: round2(ratio(conversions, clicks) * 100.0),
            bounce_rate: raw.bounce_rate,
            roi: round2(ratio(raw.revenue - spend, spend) * 100.0),
            period: raw.period,
            generated_at: Utc::now(),
        }
    }
}

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
