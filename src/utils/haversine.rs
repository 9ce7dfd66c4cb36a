//! Great-circle distance between two [`GeoPoint`]s.
//!
//! Uses the haversine formula on a spherical Earth. Compared to the
//! spherical law of cosines it stays accurate when the two points are
//! very close together, which is exactly the case that decides whether
//! a vessel sits inside a beacon's range.

use crate::location::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Returns the great-circle surface distance between `from` and `to`
/// in meters.
///
/// No validation is done on the inputs; out-of-range or NaN
/// coordinates produce an unspecified (possibly NaN) result.
///
/// The result is exactly `0.0` for identical points and exactly
/// symmetric in its arguments.
pub fn distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat_from = from.lat().to_radians();
    let lat_to = to.lat().to_radians();
    let delta_lat = (lat_to - lat_from).abs();
    let delta_lon = (to.lon().to_radians() - from.lon().to_radians()).abs();

    let mut a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push nearly antipodal points just past 1
    if a > 1.0 {
        a = 1.0;
    }
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Same as [`distance`], in kilometers.
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    distance(from, to) / 1000.0
}
