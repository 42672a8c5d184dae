//! Crime incidents and the reports attributed to streets.

use geo::Coord;

/// Free-form context carried from the source record into reports.
///
/// None of these fields affect scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CrimeContext {
    /// Block address of the incident.
    pub block: Option<String>,
    /// Police shift during which the incident was reported.
    pub shift: Option<String>,
    /// Method used, such as `GUN` or `KNIFE`.
    pub method: Option<String>,
}

/// A single crime incident read from an external feed.
///
/// Every field is optional because real feeds are incomplete. The
/// attribution engine rejects events lacking a location, an offense or a
/// timestamp rather than failing the run.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::CrimeEvent;
///
/// let event = CrimeEvent::new(
///     Some(Coord { x: -77.03, y: 38.9 }),
///     Some("ROBBERY".into()),
///     Some("2024-01-01T00:00:00Z".into()),
/// );
/// assert!(event.context.block.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeEvent {
    /// Incident position with `x = longitude` and `y = latitude`.
    pub location: Option<Coord<f64>>,
    /// Offense category, matched case-insensitively against the severity table.
    pub offense: Option<String>,
    /// Report timestamp exactly as supplied by the feed.
    pub reported_at: Option<String>,
    /// Pass-through context.
    pub context: CrimeContext,
}

impl CrimeEvent {
    /// Construct an event without context.
    #[must_use]
    pub fn new(
        location: Option<Coord<f64>>,
        offense: Option<String>,
        reported_at: Option<String>,
    ) -> Self {
        Self {
            location,
            offense,
            reported_at,
            context: CrimeContext::default(),
        }
    }

    /// Attach block, shift and method details.
    #[must_use]
    pub fn with_context(mut self, context: CrimeContext) -> Self {
        self.context = context;
        self
    }
}

/// A crime attributed to a street, together with how it was weighted.
///
/// Reports are created once by the attribution engine and never modified.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct CrimeReport {
    /// Offense category as it appeared in the source record.
    pub offense: String,
    /// Original, unparsed report timestamp.
    pub reported_at: String,
    /// Pass-through context.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub context: CrimeContext,
    /// Distance from the incident to the street centroid in kilometres.
    pub distance_km: f64,
    /// Severity weight before recency decay.
    pub base_weight: f64,
    /// Recency multiplier in `[0, 1]`.
    pub recency_multiplier: f64,
    /// `base_weight * recency_multiplier`.
    pub final_weight: f64,
}
