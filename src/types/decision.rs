//! Definition for the [`Decision`] type, the outcome of evaluating a
//! vessel position against the beacon registry.

use crate::beacon::Beacon;

/// Title of the dialog a host shows for a blocked recovery.
pub const TOO_FAR_TITLE: &str = "Vessel Too Far";

/// Outcome of an evaluation. Borrows the beacons from the registry it
/// came from, so it cannot outlive the next reload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision<'a> {
    /// The target is inside the range of `beacon`.
    Allowed { beacon: &'a Beacon },

    /// The target is outside every beacon's range. `nearest` is `None`
    /// only when there were no beacons, in which case the distance is
    /// infinite.
    Blocked {
        nearest: Option<&'a Beacon>,
        distance_meters: f64,
    },
}

impl<'a> Decision<'a> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// The beacon this decision refers to: the matching one when
    /// allowed, the nearest one when blocked.
    pub fn beacon(&self) -> Option<&'a Beacon> {
        match *self {
            Decision::Allowed { beacon } => Some(beacon),
            Decision::Blocked { nearest, .. } => nearest,
        }
    }

    /// User-facing explanation of a blocked recovery, or `None` when
    /// recovery is allowed.
    pub fn too_far_message(&self) -> Option<String> {
        match *self {
            Decision::Allowed { .. } => None,
            Decision::Blocked {
                nearest: Some(beacon),
                distance_meters,
            } => Some(format!(
                "Vessel is too far from any Recovery Beacons to recover. \
                 Closest Recovery Beacon is {} and is {}km away.",
                beacon.name(),
                format_grouped(distance_meters / 1000.0)
            )),
            Decision::Blocked { nearest: None, .. } => Some(
                "Vessel is too far from any Recovery Beacons to recover. \
                 No Recovery Beacons are registered."
                    .to_string(),
            ),
        }
    }
}

/// Two decimals with `,` thousands separators, e.g. `1,234.56`.
fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    if !value.is_finite() {
        return fixed;
    }
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}{}.{}", sign, grouped, fraction)
}
