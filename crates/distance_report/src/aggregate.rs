use std::collections::HashMap;

use chrono::NaiveDate;
use model::{CountryCode, ResolvedSegment, Segment, TimestampError};

/// Kilometers travelled per country and day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateReport {
    countries: HashMap<CountryCode, HashMap<NaiveDate, f64>>,
}

impl AggregateReport {
    pub fn get(&self, country: &str, date: NaiveDate) -> Option<f64> {
        self.countries
            .get(country)
            .and_then(|days| days.get(&date).copied())
    }

    pub fn countries(&self) -> &HashMap<CountryCode, HashMap<NaiveDate, f64>> {
        &self.countries
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Number of (country, date) buckets.
    pub fn len(&self) -> usize {
        self.countries.values().map(HashMap::len).sum()
    }

    pub fn total_km(&self) -> f64 {
        self.countries.values().flat_map(HashMap::values).sum()
    }
}

/// Accumulates resolved segments into an [`AggregateReport`].
#[derive(Debug, Default)]
pub struct Aggregator {
    report: AggregateReport,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, resolved: &ResolvedSegment) {
        *self
            .report
            .countries
            .entry(resolved.country.clone())
            .or_default()
            .entry(resolved.date)
            .or_insert(0.0) += resolved.distance_km();
    }

    /// Dates the segment by its start timestamp and adds it. A segment whose
    /// timestamp does not parse leaves the report untouched.
    pub fn add_segment(
        &mut self,
        segment: Segment,
        country: CountryCode,
    ) -> Result<(), TimestampError> {
        let resolved = ResolvedSegment::new(segment, country)?;
        self.add(&resolved);
        Ok(())
    }

    pub fn finish(self) -> AggregateReport {
        self.report
    }
}
