//! Test helpers for writing CLI input files into a temporary workspace.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Reference time matching the robbery in [`CRIMES`].
pub(super) const NOW: &str = "2024-06-01T00:00:00Z";

/// Two square streets 0.001 degrees wide and a point feature that is skipped.
pub(super) const STREETS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": "first", "properties": {"STREETNAME": "FIRST ST NW"},
     "geometry": {"type": "Polygon", "coordinates": [[[-77.001, 38.9], [-77.001, 38.901], [-77.0, 38.901], [-77.0, 38.9], [-77.001, 38.9]]]}},
    {"type": "Feature", "id": "second", "properties": {"STREETNAME": "SECOND ST NW"},
     "geometry": {"type": "Polygon", "coordinates": [[[-76.991, 38.9], [-76.991, 38.901], [-76.99, 38.901], [-76.99, 38.9], [-76.991, 38.9]]]}},
    {"type": "Feature", "properties": {"STREETNAME": "LAMP POST"},
     "geometry": {"type": "Point", "coordinates": [-77.0, 38.9]}}
  ]
}"#;

/// A robbery at the centre of the first street, reported at [`NOW`].
pub(super) const CRIMES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature",
     "properties": {"OFFENSE": "ROBBERY", "REPORT_DAT": 1717200000000, "BLOCK": "100 BLOCK OF FIRST ST NW"},
     "geometry": {"type": "Point", "coordinates": [-77.0005, 38.9005]}}
  ]
}"#;

/// Route 0 stays inside the first street, route 1 inside the second.
pub(super) const ROUTE_REQUEST: &str = r#"{
  "routes": [
    {"coordinates": [[38.9005, -77.0005], [38.9006, -77.0004]], "summary": "risky"},
    {"coordinates": [[38.9005, -76.9905], [38.9006, -76.9904]], "summary": "safe"}
  ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding the files a CLI invocation reads and writes.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn streets(&self) -> Utf8PathBuf {
        self.path("streets.geojson")
    }

    pub(super) fn crimes(&self) -> Utf8PathBuf {
        self.path("crimes.geojson")
    }

    pub(super) fn store(&self) -> Utf8PathBuf {
        self.path("streets.json")
    }

    pub(super) fn request(&self) -> Utf8PathBuf {
        self.path("request.json")
    }

    pub(super) fn write_inputs(&self) {
        write_utf8(&self.streets(), STREETS.as_bytes());
        write_utf8(&self.crimes(), CRIMES.as_bytes());
    }

    pub(super) fn write_request(&self) {
        write_utf8(&self.request(), ROUTE_REQUEST.as_bytes());
    }
}
