//! Synthetic campaign data generation.
//!
//! Every raw value is drawn uniformly from a fixed range; derived ratios are
//! computed by [`CampaignRecord::from_raw`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::campaign::{
    round2, AdType, CampaignRecord, DayPart, Device, Dimension, Period, RawCampaign, Region,
    Weekday,
};

/// Inclusive range of impressions per record.
pub const IMPRESSIONS_RANGE: (u64, u64) = (1_000, 100_000);

/// Minimum clicks per record. The maximum is 20% of impressions.
pub const MIN_CLICKS: u64 = 10;

/// Inclusive range of the cost per click.
pub const CPC_RANGE: (f64, f64) = (0.1, 5.0);

/// Inclusive range of revenue per conversion.
pub const REVENUE_PER_CONVERSION_RANGE: (f64, f64) = (5.0, 100.0);

/// Inclusive range of the bounce rate in percent.
pub const BOUNCE_RATE_RANGE: (f64, f64) = (30.0, 70.0);

/// Generates random, range-bounded campaign records.
#[derive(Debug)]
pub struct CampaignGenerator {
    rng: StdRng,
}

impl CampaignGenerator {
    /// Create a generator, seeded for reproducible output when `seed` is set.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Generate a single record.
    pub fn generate_one(&mut self) -> CampaignRecord {
        CampaignRecord::from_raw(self.generate_raw())
    }

    /// Generate `count` records.
    pub fn generate_batch(&mut self, count: usize) -> Vec<CampaignRecord> {
        (0..count).map(|_| self.generate_one()).collect()
    }

    fn generate_raw(&mut self) -> RawCampaign {
        let id = uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid();

        let impressions = self
            .rng
            .gen_range(IMPRESSIONS_RANGE.0..=IMPRESSIONS_RANGE.1);
        let max_clicks = (impressions / 5).max(MIN_CLICKS);
        let clicks = self.rng.gen_range(MIN_CLICKS..=max_clicks);
        let cpc = round2(self.rng.gen_range(CPC_RANGE.0..=CPC_RANGE.1));
        let max_conversions = (clicks / 10).max(1);
        let conversions = self.rng.gen_range(1..=max_conversions);

        #[allow(clippy::cast_precision_loss)]
        let revenue = round2(
            conversions as f64
                * self
                    .rng
                    .gen_range(REVENUE_PER_CONVERSION_RANGE.0..=REVENUE_PER_CONVERSION_RANGE.1),
        );
        let bounce_rate = round2(
            self.rng
                .gen_range(BOUNCE_RATE_RANGE.0..=BOUNCE_RATE_RANGE.1),
        );

        RawCampaign {
            id,
            ad_type: self.pick::<AdType>(),
            region: self.pick::<Region>(),
            device: self.pick::<Device>(),
            impressions,
            clicks,
            cpc,
            conversions,
            revenue,
            bounce_rate,
            period: Period {
                day: self.pick::<Weekday>(),
                part: self.pick::<DayPart>(),
            },
        }
    }

    fn pick<D: Dimension>(&mut self) -> D {
        D::ALL[self.rng.gen_range(0..D::ALL.len())]
    }
}

impl Default for CampaignGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}
