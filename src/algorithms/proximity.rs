//! The recovery decision rule.
//!
//! Walks the beacons once, in registry order, and decides whether a
//! target is inside any beacon's range. When it is not, the nearest
//! beacon and its raw distance are reported.

use serde::{Deserialize, Serialize};

use crate::beacon::Beacon;
use crate::decision::Decision;
use crate::location::GeoPoint;

/// How to pick a beacon when the target is inside several ranges.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The first in-range beacon in registry order wins and the scan
    /// stops there, even if a later beacon is closer.
    #[default]
    FirstInRange,

    /// The nearest in-range beacon wins. Every beacon is examined.
    NearestInRange,
}

/// Evaluates `target` against `beacons`.
///
/// Out of range of everything, the result is
/// [`Decision::Blocked`] with the beacon at the smallest distance (the
/// earliest one on ties). If no distance is comparable (NaN input),
/// the first beacon is reported with a NaN distance. Only an empty
/// slice yields `Blocked` with no beacon and an infinite distance.
///
/// # Time Complexity
/// *O*(*n*), one distance computation per beacon at most.
pub fn evaluate<'a>(beacons: &'a [Beacon], target: &GeoPoint, policy: MatchPolicy) -> Decision<'a> {
    let mut nearest: Option<&'a Beacon> = None;
    let mut shortest_distance = f64::INFINITY;
    let mut best_match: Option<(&'a Beacon, f64)> = None;

    for beacon in beacons {
        let distance = beacon.distance_to(target);
        debug!(
            "beacon {} at {}: distance {} m, range {} m",
            beacon.name(),
            beacon.center(),
            distance,
            beacon.range_meters()
        );

        if beacon.covers(distance) {
            match policy {
                MatchPolicy::FirstInRange => return Decision::Allowed { beacon },
                MatchPolicy::NearestInRange => {
                    if !matches!(best_match, Some((_, best)) if best <= distance) {
                        best_match = Some((beacon, distance));
                    }
                }
            }
        } else if nearest.is_none() || distance < shortest_distance {
            shortest_distance = distance;
            nearest = Some(beacon);
        }
    }

    match best_match {
        Some((beacon, _)) => Decision::Allowed { beacon },
        None => Decision::Blocked {
            nearest,
            distance_meters: shortest_distance,
        },
    }
}
