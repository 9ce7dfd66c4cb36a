//! Recovery Beacon Gating Library.
//! Decides whether a vessel is close enough to a recovery beacon to be
//! recovered, and if not, which beacon is the nearest.
//!
//! The host supplies the vessel position and the path of the beacon
//! file; the library only decides. Acting on a [`Decision`] (running
//! the recovery or showing a "too far" dialog) is left to a
//! [`RecoveryHost`].

#[macro_use]
extern crate log;

pub mod config;

pub mod types {
    pub mod beacon;
    pub mod decision;
    pub mod error;
    pub mod location;
    pub mod registry;
}

pub mod utils {
    pub mod config_node;
    pub mod haversine;
    pub mod recovery_gate;
}

pub mod algorithms {
    pub mod proximity;
}

pub use types::*;
pub use utils::*;

pub use algorithms::proximity::MatchPolicy;
pub use config::GateConfig;
pub use types::beacon::Beacon;
pub use types::decision::Decision;
pub use types::error::{LoadError, RecordError};
pub use types::location::GeoPoint;
pub use types::registry::{BeaconRegistry, RegistryState};
pub use utils::recovery_gate::{RecoveryGate, RecoveryHost};
