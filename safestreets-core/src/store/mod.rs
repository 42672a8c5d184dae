//! Persistence seams for street records.
//!
//! The core never performs I/O itself. Callers load streets through a
//! [`StreetSource`] before scoring and hand the scored collection to a
//! [`StreetSink`] afterwards. Both traits are implemented by the JSON store in
//! `safestreets-data` and by the in-memory store in [`crate::test_support`].

use crate::StreetPolygon;

/// Supplies the persisted street collection.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use safestreets_core::{StreetPolygon, StreetSource};
///
/// struct Fixed(Vec<StreetPolygon>);
///
/// impl StreetSource for Fixed {
///     type Error = Infallible;
///
///     fn load_streets(&self) -> Result<Vec<StreetPolygon>, Self::Error> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let source = Fixed(vec![StreetPolygon::new("1", "A St", Vec::new())]);
/// assert_eq!(source.load_streets().map(|s| s.len()), Ok(1));
/// ```
pub trait StreetSource {
    /// Failure raised while reading streets.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every street in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error when the backing data cannot be
    /// read or decoded.
    fn load_streets(&self) -> Result<Vec<StreetPolygon>, Self::Error>;
}

/// Persists scored streets together with their report history.
pub trait StreetSink {
    /// Failure raised while writing streets.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the persisted collection with `streets`.
    ///
    /// # Errors
    ///
    /// Returns the implementation's error when the data cannot be written.
    fn persist_streets(&mut self, streets: &[StreetPolygon]) -> Result<(), Self::Error>;
}
