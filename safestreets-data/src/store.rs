//! File-backed street persistence.

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use safestreets_core::{StreetPolygon, StreetSink, StreetSource};

use crate::{DataError, FormatError, read_file};

/// Street collection stored as a JSON array on disk.
///
/// Each element is a street with its ring as `[longitude, latitude]` pairs,
/// its safety score and its report history. Writes replace the file
/// atomically.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use safestreets_core::test_support::square_street;
/// use safestreets_core::{StreetSink, StreetSource};
/// use safestreets_data::JsonStreetStore;
///
/// let dir = tempfile::tempdir().expect("temporary directory");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("streets.json")).expect("UTF-8 path");
/// let mut store = JsonStreetStore::new(path);
/// store.persist_streets(&[square_street("1", 0.0, 0.0, 1.0)]).expect("write");
/// assert_eq!(store.load_streets().expect("read").len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStreetStore {
    path: Utf8PathBuf,
}

impl JsonStreetStore {
    /// Store streets at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing the store.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl StreetSource for JsonStreetStore {
    type Error = DataError;

    fn load_streets(&self) -> Result<Vec<StreetPolygon>, Self::Error> {
        let contents = read_file(&self.path)?;
        serde_json::from_str(&contents).map_err(|source| DataError::Format {
            path: self.path.clone(),
            source: FormatError::Json(source),
        })
    }
}

impl StreetSink for JsonStreetStore {
    type Error = DataError;

    fn persist_streets(&mut self, streets: &[StreetPolygon]) -> Result<(), Self::Error> {
        let bytes = serde_json::to_vec_pretty(streets).map_err(|source| DataError::Format {
            path: self.path.clone(),
            source: FormatError::Json(source),
        })?;
        safestreets_fs::write_atomically(&self.path, &bytes).map_err(|source| {
            DataError::Write {
                path: self.path.clone(),
                source,
            }
        })?;
        info!("persisted {} streets to {}", streets.len(), self.path);
        Ok(())
    }
}
