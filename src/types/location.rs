//! Struct definitions and implementations for [`GeoPoint`].

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A [`GeoPoint`] is the geographic position of a beacon centre or of
/// the vessel being evaluated.
///
/// Values are in degrees and are not range-checked on construction.
/// Out-of-range input flows through the distance math unchanged; use
/// [`GeoPoint::is_within_bounds`] where validation is wanted.
#[derive(Debug, PartialEq, Hash, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    /// The latitude of the point, in degrees.
    pub latitude: OrderedFloat<f64>,

    /// The longitude of the point, in degrees.
    pub longitude: OrderedFloat<f64>,
}

impl GeoPoint {
    /// Creates a point from raw degree values.
    pub fn new(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.latitude.into_inner()
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.longitude.into_inner()
    }

    /// Returns true if latitude is within [-90, 90] and longitude within
    /// [-180, 180]. NaN coordinates are never within bounds.
    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat()) && (-180.0..=180.0).contains(&self.lon())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat(), self.lon())
    }
}
