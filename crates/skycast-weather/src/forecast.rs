//! Forecast aggregation.
//!
//! The provider reports one sample per 3-hour window. Aggregation scans the
//! samples once, buckets them by UTC calendar date, and finalizes one
//! summary per day. Input must already be in chronological order (the
//! provider contract); the scan does not re-sort samples.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

use crate::types::RawSample;

/// Finalized summary for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Full precision; rounding to whole degrees happens at render time.
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition_code: u32,
    pub condition_text: String,
    pub avg_wind_speed: f64,
    /// Total precipitation volume; 0 is reported as 0, never omitted, so
    /// the renderer can decide whether to show the line.
    pub total_precipitation: f64,
}

/// Per-day accumulator.
#[derive(Debug)]
struct DayBucket {
    temp_min: f64,
    temp_max: f64,
    /// Condition code tally in first-seen order. Order matters for the
    /// tie-break in `dominant_condition`.
    tally: Vec<(u32, u32)>,
    /// First-seen condition text per code.
    texts: Vec<(u32, String)>,
    precipitation: f64,
    wind_total: f64,
    samples: u32,
}

impl DayBucket {
    fn new() -> Self {
        Self {
            temp_min: f64::INFINITY,
            temp_max: f64::NEG_INFINITY,
            tally: Vec::new(),
            texts: Vec::new(),
            precipitation: 0.0,
            wind_total: 0.0,
            samples: 0,
        }
    }

    fn add(&mut self, sample: &RawSample) {
        self.temp_min = self.temp_min.min(sample.temp_min);
        self.temp_max = self.temp_max.max(sample.temp_max);
        self.precipitation += sample.rain_3h.unwrap_or(0.0);
        self.wind_total += sample.wind_speed;
        self.samples += 1;

        match self
            .tally
            .iter_mut()
            .find(|(code, _)| *code == sample.condition_code)
        {
            Some((_, count)) => *count += 1,
            None => {
                self.tally.push((sample.condition_code, 1));
                self.texts
                    .push((sample.condition_code, sample.condition_text.clone()));
            }
        }
    }

    /// Most frequent condition code, with its first-seen text.
    ///
    /// Tie-break: the tally is scanned left-to-right in first-seen order and
    /// the running winner is replaced whenever a count is greater than *or
    /// equal to* the current max. Among tied codes the one seen latest
    /// therefore wins. This mirrors the long-standing server behavior and is
    /// pinned by tests; do not "fix" it to first-occurrence-wins without
    /// deciding that the output change is acceptable.
    fn dominant_condition(&self) -> Option<(u32, &str)> {
        let mut winner: Option<(u32, u32)> = None;
        for &(code, count) in &self.tally {
            match winner {
                Some((_, best)) if count < best => {}
                _ => winner = Some((code, count)),
            }
        }
        let (code, _) = winner?;
        self.texts
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, text)| (code, text.as_str()))
    }

    fn finalize(&self, date: NaiveDate) -> Option<DaySummary> {
        if self.samples == 0 {
            return None;
        }
        let (condition_code, condition_text) = self.dominant_condition()?;

        Some(DaySummary {
            date,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            condition_code,
            condition_text: condition_text.to_string(),
            avg_wind_speed: self.wind_total / f64::from(self.samples),
            total_precipitation: self.precipitation,
        })
    }
}

/// Group chronologically ordered samples into at most `days` daily
/// summaries, in ascending date order.
///
/// `days` is expected to be pre-clamped by the caller. When fewer distinct
/// days are present than requested, only the available days are returned.
pub fn aggregate_daily(samples: &[RawSample], days: usize) -> Vec<DaySummary> {
    // BTreeMap keys come back sorted, which for calendar dates is ascending
    // chronological order regardless of the order days were first seen.
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for sample in samples {
        let Some(timestamp) = DateTime::from_timestamp(sample.timestamp, 0) else {
            tracing::warn!(dt = sample.timestamp, "skipping sample with out-of-range timestamp");
            continue;
        };
        buckets
            .entry(timestamp.date_naive())
            .or_insert_with(DayBucket::new)
            .add(sample);
    }

    buckets
        .iter()
        .take(days)
        .filter_map(|(date, bucket)| bucket.finalize(*date))
        .collect()
}
