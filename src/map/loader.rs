//! Map definition loading.
//!
//! A map is a JSON document listing regions and their bounding boxes:
//!
//! ```json
//! {
//!   "name": "demo",
//!   "regions": [
//!     { "id": "alpina", "bounds": { "x": 0, "y": 0, "width": 120, "height": 90 } }
//!   ]
//! }
//! ```
//!
//! The parsed definition doubles as the engine's geometry source.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{BBox, GeometryProvider, Point};

/// Errors that can occur while loading a map definition.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("map defines no regions")]
    Empty,

    #[error("duplicate region id '{0}'")]
    DuplicateRegion(String),
}

/// A single region entry in a map file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: String,
    pub bounds: BBox,
}

/// A parsed map definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDef {
    #[serde(default)]
    pub name: String,
    pub regions: Vec<RegionDef>,
}

impl MapDef {
    /// Loads and validates a map definition from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MapDef, MapError> {
        let text = fs::read_to_string(path)?;
        MapDef::from_json(&text)
    }

    /// Parses and validates a map definition from JSON text.
    pub fn from_json(text: &str) -> Result<MapDef, MapError> {
        let def: MapDef = serde_json::from_str(text)?;
        if def.regions.is_empty() {
            return Err(MapError::Empty);
        }
        let mut seen = BTreeSet::new();
        for region in &def.regions {
            if !seen.insert(region.id.as_str()) {
                return Err(MapError::DuplicateRegion(region.id.clone()));
            }
        }
        Ok(def)
    }

    /// Returns all region identifiers in file order.
    pub fn region_ids(&self) -> Vec<String> {
        self.regions.iter().map(|r| r.id.clone()).collect()
    }
}

impl GeometryProvider for MapDef {
    fn bounding_box(&self, region: &str) -> Option<BBox> {
        self.regions
            .iter()
            .find(|r| r.id == region)
            .map(|r| r.bounds)
    }

    /// The box origin lies on the region boundary, which is all a
    /// box-only map can offer as a boundary point.
    fn boundary_point(&self, region: &str) -> Option<Point> {
        self.bounding_box(region).map(|b| Point::new(b.x, b.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"{
        "name": "demo",
        "regions": [
            { "id": "alpina", "bounds": { "x": 0, "y": 0, "width": 120, "height": 90 } },
            { "id": "borduria", "bounds": { "x": 120, "y": 0, "width": 100, "height": 90 } }
        ]
    }"#;

    #[test]
    fn parses_valid_map() {
        let def = MapDef::from_json(DEMO).unwrap();
        assert_eq!(def.name, "demo");
        assert_eq!(def.region_ids(), vec!["alpina", "borduria"]);
    }

    #[test]
    fn rejects_empty_region_list() {
        let err = MapDef::from_json(r#"{ "regions": [] }"#).unwrap_err();
        assert!(matches!(err, MapError::Empty));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let text = r#"{
            "regions": [
                { "id": "x", "bounds": { "x": 0, "y": 0, "width": 1, "height": 1 } },
                { "id": "x", "bounds": { "x": 5, "y": 0, "width": 1, "height": 1 } }
            ]
        }"#;
        let err = MapDef::from_json(text).unwrap_err();
        assert!(matches!(err, MapError::DuplicateRegion(id) if id == "x"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            MapDef::from_json("not json").unwrap_err(),
            MapError::Parse(_)
        ));
    }

    #[test]
    fn provides_geometry() {
        let def = MapDef::from_json(DEMO).unwrap();
        assert_eq!(
            def.bounding_box("alpina"),
            Some(BBox::new(0.0, 0.0, 120.0, 90.0))
        );
        assert_eq!(def.bounding_box("nowhere"), None);
        assert_eq!(def.boundary_point("borduria"), Some(Point::new(120.0, 0.0)));
    }
}
