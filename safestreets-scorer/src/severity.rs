//! Offense severity weights.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::AttributionConfigError;

/// Weight applied to offenses missing from the table.
pub const DEFAULT_SEVERITY: f64 = 3.0;

/// Weights for the offense categories published in the District of Columbia
/// crime feed.
pub const DC_OFFENSE_WEIGHTS: [(&str, f64); 9] = [
    ("HOMICIDE", 10.0),
    ("SEX ABUSE", 9.0),
    ("ROBBERY", 8.0),
    ("ARSON", 8.0),
    ("ASSAULT W/DANGEROUS WEAPON", 7.0),
    ("BURGLARY", 6.0),
    ("MOTOR VEHICLE THEFT", 5.0),
    ("THEFT/OTHER", 4.0),
    ("THEFT F/AUTO", 3.0),
];

/// Maps offense categories to a base severity weight.
///
/// Keys are compared after trimming surrounding whitespace and upper-casing,
/// so `" robbery"` and `"ROBBERY"` share a weight. Offenses missing from the
/// table fall back to the default weight.
///
/// # Examples
/// ```
/// use safestreets_scorer::SeverityTable;
///
/// let table = SeverityTable::default();
/// assert_eq!(table.weight(" robbery "), Some(8.0));
/// assert_eq!(table.weight("JAYWALKING"), None);
/// assert_eq!(table.weight_or_default("JAYWALKING"), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityTable {
    weights: BTreeMap<String, f64>,
    default_weight: f64,
}

impl SeverityTable {
    /// Build a table from `(offense, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AttributionConfigError::InvalidSeverityWeight`] when a weight
    /// is negative or not finite, and
    /// [`AttributionConfigError::InvalidDefaultSeverity`] when the default is.
    pub fn from_weights<I, K>(weights: I, default_weight: f64) -> Result<Self, AttributionConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        if !is_usable_weight(default_weight) {
            return Err(AttributionConfigError::InvalidDefaultSeverity {
                weight: default_weight,
            });
        }
        let mut table = BTreeMap::new();
        for (offense, weight) in weights {
            if !is_usable_weight(weight) {
                return Err(AttributionConfigError::InvalidSeverityWeight {
                    offense: offense.as_ref().to_owned(),
                    weight,
                });
            }
            table.insert(normalise_offense(offense.as_ref()), weight);
        }
        Ok(Self {
            weights: table,
            default_weight,
        })
    }

    /// Weight for `offense`, or `None` when the table has no entry.
    #[must_use]
    pub fn weight(&self, offense: &str) -> Option<f64> {
        self.weights.get(&normalise_offense(offense)).copied()
    }

    /// Weight for `offense`, falling back to the default weight.
    #[must_use]
    pub fn weight_or_default(&self, offense: &str) -> f64 {
        self.weight(offense).unwrap_or(self.default_weight)
    }

    /// Weight used for offenses missing from the table.
    #[must_use]
    pub const fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Number of configured offense categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no offense categories are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self {
            weights: DC_OFFENSE_WEIGHTS
                .iter()
                .map(|&(offense, weight)| (offense.to_owned(), weight))
                .collect(),
            default_weight: DEFAULT_SEVERITY,
        }
    }
}

fn normalise_offense(offense: &str) -> String {
    offense.trim().to_uppercase()
}

fn is_usable_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}
