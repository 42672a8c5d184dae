//! Serde adapters for coordinates and durations.
//!
//! Street rings persist as `[longitude, latitude]` pairs, matching GeoJSON.
//! Route coordinates arrive as `[latitude, longitude]` pairs, matching what
//! directions services return. Durations are written as fractional seconds.

use std::time::Duration;

use geo::Coord;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) mod lon_lat {
    use super::{Coord, Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        coords: &[Coord<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(coords.iter().map(|c| [c.x, c.y]))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Coord<f64>>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}

pub(crate) mod lat_lon {
    use super::{Coord, Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        coords: &[Coord<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(coords.iter().map(|c| [c.y, c.x]))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Coord<f64>>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[y, x]| Coord { x, y }).collect())
    }
}

pub(crate) mod duration_secs {
    use super::{Deserialize, Deserializer, Duration, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
