//! Configuration of the recovery gate.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::algorithms::proximity::MatchPolicy;

/// Beacon file location relative to the host application root.
pub const DEFAULT_BEACON_FILE: &str = "GameData/NIMBY/Beacons.cfg";

/// Settings for a [`RecoveryGate`](crate::recovery_gate::RecoveryGate).
///
/// Every field has a default, so a partial (or empty) document
/// deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Path of the beacon file.
    pub beacon_file: PathBuf,

    /// Create a default beacon file when none exists.
    pub create_if_missing: bool,

    /// Tie-break when a vessel is inside several beacon ranges.
    pub policy: MatchPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            beacon_file: PathBuf::from(DEFAULT_BEACON_FILE),
            create_if_missing: true,
            policy: MatchPolicy::default(),
        }
    }
}

impl GateConfig {
    /// Default settings with the beacon file under `app_root`.
    pub fn rooted_at(app_root: impl AsRef<Path>) -> GateConfig {
        GateConfig {
            beacon_file: app_root.as_ref().join(DEFAULT_BEACON_FILE),
            ..GateConfig::default()
        }
    }
}
