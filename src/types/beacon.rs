//! Struct definitions and implementations for [`Beacon`].
//!
//! A beacon is a named, circular recovery zone. Vessels inside the
//! circle may be recovered; vessels outside every circle may not.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config_node::{is_writable_value, ConfigNode};
use crate::error::RecordError;
use crate::haversine;
use crate::location::GeoPoint;

/// Name given to the beacon synthesized when no beacon file exists.
pub const DEFAULT_BEACON_NAME: &str = "KSC";

/// Radius of the synthesized default beacon.
pub const DEFAULT_BEACON_RANGE_METERS: f64 = 100_000.0;

/// Node name of a single beacon record in the beacon file.
pub const BEACON_NODE: &str = "Beacon";

/// A named recovery zone.
///
/// Beacons are immutable once built; the fields are only exposed
/// through accessors. The name is for display and is not required to
/// be unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Beacon {
    name: String,

    /// Centre of the zone.
    center: GeoPoint,

    /// Zone radius. A zero or negative range never allows recovery,
    /// but the beacon can still be reported as the nearest one.
    range_meters: OrderedFloat<f64>,
}

impl Beacon {
    pub fn new(name: impl Into<String>, center: GeoPoint, range_meters: f64) -> Beacon {
        Beacon {
            name: name.into(),
            center,
            range_meters: OrderedFloat(range_meters),
        }
    }

    /// The default beacon: [`DEFAULT_BEACON_NAME`] at `reference` with
    /// a [`DEFAULT_BEACON_RANGE_METERS`] radius.
    pub fn default_at(reference: GeoPoint) -> Beacon {
        Beacon::new(DEFAULT_BEACON_NAME, reference, DEFAULT_BEACON_RANGE_METERS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> &GeoPoint {
        &self.center
    }

    pub fn range_meters(&self) -> f64 {
        self.range_meters.into_inner()
    }

    /// Great-circle distance from the beacon centre to `target`.
    pub fn distance_to(&self, target: &GeoPoint) -> f64 {
        haversine::distance(&self.center, target)
    }

    /// Whether a target `distance_meters` away is inside the zone. The
    /// boundary itself is outside.
    pub fn covers(&self, distance_meters: f64) -> bool {
        distance_meters < self.range_meters()
    }

    /// Canonical `Beacon` record for the beacon file.
    ///
    /// Fails if the name contains text the beacon file cannot hold
    /// (braces, `//`, line breaks or surrounding whitespace).
    pub fn as_node(&self) -> Result<ConfigNode, RecordError> {
        if !is_writable_value(&self.name) {
            return Err(RecordError::Unwritable {
                field: "name",
                value: self.name.clone(),
            });
        }
        let mut node = ConfigNode::new(BEACON_NODE);
        node.add_value("name", &self.name);
        node.add_value("lat", self.center.lat());
        node.add_value("lon", self.center.lon());
        node.add_value("range", self.range_meters());
        Ok(node)
    }
}

/// Reads a `Beacon` record. `name`, `lat`, `lon` and `range` are
/// required; any other key is ignored.
impl TryFrom<&ConfigNode> for Beacon {
    type Error = RecordError;

    fn try_from(node: &ConfigNode) -> Result<Self, Self::Error> {
        let name = node
            .get_value("name")
            .filter(|name| !name.is_empty())
            .ok_or(RecordError::MissingField("name"))?;
        let latitude = parse_number(node, "lat")?;
        let longitude = parse_number(node, "lon")?;
        let range = parse_number(node, "range")?;

        Ok(Beacon::new(
            name,
            GeoPoint::new(latitude, longitude),
            range,
        ))
    }
}

//---------------------------------------------------------------
// Private functions
//---------------------------------------------------------------

fn parse_number(node: &ConfigNode, field: &'static str) -> Result<f64, RecordError> {
    let value = node
        .get_value(field)
        .ok_or(RecordError::MissingField(field))?;
    value.parse::<f64>().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
