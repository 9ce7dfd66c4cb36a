//! Host-facing recovery gate.
//!
//! A host intercepts its "recover vessel" action and routes it through
//! [`RecoveryGate::on_recover_pressed`]. The gate evaluates the vessel
//! position and then either runs the host's original recovery or asks
//! the host to report why it was refused.

use crate::config::GateConfig;
use crate::decision::TOO_FAR_TITLE;
use crate::error::LoadError;
use crate::location::GeoPoint;
use crate::registry::BeaconRegistry;

/// Actions the host performs on behalf of the gate.
pub trait RecoveryHost {
    /// Runs the host's original recovery action.
    fn recover(&mut self);

    /// Shows the user why recovery was refused.
    fn report_too_far(&mut self, title: &str, message: &str);
}

/// A beacon registry bound to its configuration.
#[derive(Debug)]
pub struct RecoveryGate {
    config: GateConfig,
    registry: BeaconRegistry,
}

impl RecoveryGate {
    /// Creates a gate with an empty registry. Call
    /// [`RecoveryGate::reload`] before the first evaluation.
    pub fn new(config: GateConfig) -> RecoveryGate {
        let registry = BeaconRegistry::with_policy(config.policy);
        RecoveryGate { config, registry }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn registry(&self) -> &BeaconRegistry {
        &self.registry
    }

    /// (Re)loads the configured beacon file. `reference` is where the
    /// default beacon goes if the file has to be created.
    pub fn reload(&mut self, reference: GeoPoint) -> Result<(), LoadError> {
        self.registry.load_beacons(
            &self.config.beacon_file,
            self.config.create_if_missing,
            reference,
        )
    }

    /// Handles a recovery request for the vessel at `target`.
    ///
    /// `None` means the host has no vessel selected; nothing happens.
    /// Returns whether the host's recovery action was run.
    pub fn on_recover_pressed(
        &self,
        target: Option<GeoPoint>,
        host: &mut impl RecoveryHost,
    ) -> bool {
        let Some(target) = target else {
            error!("No vessel selected, ignoring recovery request");
            return false;
        };

        let decision = self.registry.evaluate(&target);
        match decision.too_far_message() {
            None => {
                info!(
                    "Recovering vessel at {} via beacon {}",
                    target,
                    decision.beacon().map_or("<none>", |b| b.name())
                );
                host.recover();
                true
            }
            Some(message) => {
                info!("Vessel at {} is too far to recover", target);
                host.report_too_far(TOO_FAR_TITLE, &message);
                false
            }
        }
    }
}
