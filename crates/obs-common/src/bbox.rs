//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::{ObsError, ObsResult};

/// A geographic bounding box in WGS84 degrees.
///
/// Edges are named by compass direction rather than min/max so that domain
/// definitions read the way forecasters write them. Boxes never wrap the
/// antimeridian; `validate` rejects inverted edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from edge coordinates.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point of the box as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Check if a point is contained within this box (edges inclusive).
    ///
    /// Non-finite coordinates are never contained, so NaN lat/lon records
    /// fall out of spatial filters without special casing.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Expand the box outward by a padding amount in degrees.
    pub fn expand(&self, padding: f64) -> Self {
        Self {
            west: self.west - padding,
            east: self.east + padding,
            south: self.south - padding,
            north: self.north + padding,
        }
    }

    /// Validate edge ordering: west < east and south < north.
    pub fn validate(&self, name: &str) -> ObsResult<()> {
        if !(self.west < self.east) {
            return Err(ObsError::invalid_bounds(
                name,
                format!("west ({}) must be < east ({})", self.west, self.east),
            ));
        }
        if !(self.south < self.north) {
            return Err(ObsError::invalid_bounds(
                name,
                format!("south ({}) must be < north ({})", self.south, self.north),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_and_center() {
        let bbox = BoundingBox::new(-108.0, -93.0, 25.0, 38.0);
        assert!((bbox.width() - 15.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 13.0).abs() < f64::EPSILON);
        let (lon, lat) = bbox.center();
        assert!((lon - -100.5).abs() < f64::EPSILON);
        assert!((lat - 31.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_rejects_nan() {
        let bbox = BoundingBox::new(-100.0, -90.0, 30.0, 40.0);
        assert!(bbox.contains(-95.0, 35.0));
        assert!(!bbox.contains(f64::NAN, 35.0));
        assert!(!bbox.contains(-95.0, f64::NAN));
    }

    #[test]
    fn test_expand() {
        let bbox = BoundingBox::new(-100.0, -90.0, 30.0, 40.0).expand(2.0);
        assert_eq!(bbox.west, -102.0);
        assert_eq!(bbox.east, -88.0);
        assert_eq!(bbox.south, 28.0);
        assert_eq!(bbox.north, 42.0);
    }

    #[test]
    fn test_validate_inverted_edges() {
        assert!(BoundingBox::new(-100.0, -90.0, 30.0, 40.0)
            .validate("ok")
            .is_ok());
        assert!(BoundingBox::new(-90.0, -100.0, 30.0, 40.0)
            .validate("bad-lon")
            .is_err());
        assert!(BoundingBox::new(-100.0, -90.0, 40.0, 30.0)
            .validate("bad-lat")
            .is_err());
        // Degenerate (equal edges) is also invalid.
        assert!(BoundingBox::new(-90.0, -90.0, 30.0, 40.0)
            .validate("degenerate")
            .is_err());
    }
}
