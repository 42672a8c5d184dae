//! Per-street running totals built during attribution.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use safestreets_core::{CrimeReport, StreetId};

/// Weighted crime total for one street.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetTally {
    /// Sum of final weights.
    pub total_weight: f64,
    /// Number of crimes attributed.
    pub crime_count: usize,
    /// Reports in attribution order.
    pub reports: Vec<CrimeReport>,
}

impl StreetTally {
    #[expect(
        clippy::float_arithmetic,
        reason = "weights accumulate as floating point sums"
    )]
    fn add(&mut self, report: CrimeReport) {
        self.total_weight += report.final_weight;
        self.crime_count += 1;
        self.reports.push(report);
    }
}

/// Collects attributed crimes keyed by street.
///
/// The accumulator is owned by a single reducer, which applies reports in
/// event order so floating point sums are reproducible.
///
/// # Examples
/// ```
/// use safestreets_core::{CrimeContext, CrimeReport, StreetId};
/// use safestreets_scorer::CrimeAccumulator;
///
/// let report = CrimeReport {
///     offense: "ROBBERY".into(),
///     reported_at: "2024-01-01".into(),
///     context: CrimeContext::default(),
///     distance_km: 0.02,
///     base_weight: 8.0,
///     recency_multiplier: 1.0,
///     final_weight: 8.0,
/// };
/// let street = StreetId::from("1");
/// let mut accumulator = CrimeAccumulator::default();
/// accumulator.record(&street, report);
/// let tally = accumulator.tally(&street).expect("street has a tally");
/// assert_eq!(tally.crime_count, 1);
/// assert_eq!(tally.total_weight, 8.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeAccumulator {
    tallies: BTreeMap<StreetId, StreetTally>,
}

impl CrimeAccumulator {
    /// Add `report` to the tally for `street`.
    pub fn record(&mut self, street: &StreetId, report: CrimeReport) {
        if let Some(tally) = self.tallies.get_mut(street) {
            tally.add(report);
        } else {
            let mut tally = StreetTally::default();
            tally.add(report);
            self.tallies.insert(street.clone(), tally);
        }
    }

    /// Tally for `street`, if any crime was attributed to it.
    #[must_use]
    pub fn tally(&self, street: &StreetId) -> Option<&StreetTally> {
        self.tallies.get(street)
    }

    /// Remove and return the tally for `street`.
    pub fn take(&mut self, street: &StreetId) -> Option<StreetTally> {
        self.tallies.remove(street)
    }

    /// Number of streets with at least one attributed crime.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    /// Whether no crime has been attributed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Iterate over tallies in street id order.
    pub fn iter(&self) -> impl Iterator<Item = (&StreetId, &StreetTally)> {
        self.tallies.iter()
    }
}
