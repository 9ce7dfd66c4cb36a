//! The beacon registry.
//!
//! Owns the current set of beacons, replaces it wholesale on every
//! load, and evaluates vessel positions against it.

use std::fs;
use std::io;
use std::path::Path;

use crate::algorithms::proximity::{self, MatchPolicy};
use crate::beacon::{Beacon, BEACON_NODE};
use crate::config_node::ConfigNode;
use crate::decision::Decision;
use crate::error::{LoadError, RecordError, SyntaxError};
use crate::location::GeoPoint;

/// Node name of the collection wrapping the beacon records.
pub const BEACONS_NODE: &str = "Beacons";

/// Whether the registry has been populated yet.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum RegistryState {
    /// Nothing loaded yet; evaluations see no beacons.
    #[default]
    Empty,
    /// A load or default creation has succeeded at least once.
    Loaded,
}

/// Owner of the active beacon list.
///
/// Beacons keep file order; with [`MatchPolicy::FirstInRange`] that
/// order decides which beacon allows a recovery when ranges overlap.
#[derive(Debug, Default)]
pub struct BeaconRegistry {
    beacons: Vec<Beacon>,
    state: RegistryState,
    policy: MatchPolicy,
}

impl BeaconRegistry {
    /// Creates an empty registry using [`MatchPolicy::FirstInRange`].
    pub fn new() -> BeaconRegistry {
        BeaconRegistry::default()
    }

    /// Creates an empty registry with the given tie-break policy.
    pub fn with_policy(policy: MatchPolicy) -> BeaconRegistry {
        BeaconRegistry {
            policy,
            ..BeaconRegistry::default()
        }
    }

    /// Creates a loaded registry from beacons the host assembled itself.
    pub fn from_beacons(beacons: Vec<Beacon>) -> BeaconRegistry {
        let mut registry = BeaconRegistry::new();
        registry.replace(beacons);
        registry
    }

    pub fn beacons(&self) -> &[Beacon] {
        &self.beacons
    }

    pub fn len(&self) -> usize {
        self.beacons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beacons.is_empty()
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MatchPolicy) {
        self.policy = policy;
    }

    /// Replaces the beacons with the contents of the file at `path`.
    ///
    /// The new list is built completely before it is swapped in; on any
    /// error the previous beacons and state are left untouched.
    /// Records missing a required field, or with a field that is not a
    /// number, are skipped with a warning.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        info!("Loading beacons from {}", path.display());

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(path.to_path_buf()))
            }
            Err(source) => {
                return Err(LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let beacons = parse_beacons(&text).map_err(|e| e.into_load_error(path))?;

        info!("Loaded {} beacon(s) from {}", beacons.len(), path.display());
        self.replace(beacons);
        Ok(())
    }

    /// Like [`BeaconRegistry::load`], except that a missing file is
    /// replaced by a single default beacon at `reference`, which is
    /// then written to `path`.
    ///
    /// If writing fails the default beacon stays active and
    /// [`LoadError::Write`] is returned.
    pub fn load_or_create_default(
        &mut self,
        path: impl AsRef<Path>,
        reference: GeoPoint,
    ) -> Result<(), LoadError> {
        let path = path.as_ref();
        match self.load(path) {
            Err(LoadError::NotFound(_)) => self.create_default(path, reference),
            other => other,
        }
    }

    /// Host-facing entry point: [`BeaconRegistry::load_or_create_default`]
    /// when `create_if_missing` is set, [`BeaconRegistry::load`]
    /// otherwise.
    pub fn load_beacons(
        &mut self,
        path: impl AsRef<Path>,
        create_if_missing: bool,
        reference: GeoPoint,
    ) -> Result<(), LoadError> {
        if create_if_missing {
            self.load_or_create_default(path, reference)
        } else {
            self.load(path)
        }
    }

    /// Decides whether `target` may be recovered. Never fails; an empty
    /// registry blocks everything.
    pub fn evaluate(&self, target: &GeoPoint) -> Decision<'_> {
        debug!(
            "Evaluating {} against {} beacon(s)",
            target,
            self.beacons.len()
        );
        proximity::evaluate(&self.beacons, target, self.policy)
    }

    /// The active beacons as a `Beacons` node. Fails on the first
    /// beacon that cannot be written.
    pub fn to_node(&self) -> Result<ConfigNode, RecordError> {
        let mut node = ConfigNode::new(BEACONS_NODE);
        for beacon in &self.beacons {
            node.add_node(beacon.as_node()?);
        }
        Ok(node)
    }

    fn replace(&mut self, beacons: Vec<Beacon>) {
        self.beacons = beacons;
        self.state = RegistryState::Loaded;
    }

    fn create_default(&mut self, path: &Path, reference: GeoPoint) -> Result<(), LoadError> {
        let beacon = Beacon::default_at(reference);
        info!(
            "No beacon file at {}, creating default beacon {} at {}",
            path.display(),
            beacon.name(),
            reference
        );
        self.replace(vec![beacon]);

        let write_error = |source: io::Error| LoadError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let node = self
            .to_node()
            .map_err(|e| write_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        fs::write(path, node.to_string()).map_err(write_error)
    }
}

/// Reads beacons from beacon file text, in document order.
///
/// Records are taken from every top-level `Beacons` node and from bare
/// top-level `Beacon` nodes. Only structural errors fail; bad records
/// are skipped.
pub fn parse_beacons(text: &str) -> Result<Vec<Beacon>, SyntaxError> {
    let root = ConfigNode::parse(text)?;

    let mut beacons = Vec::new();
    for node in root.nodes() {
        let records: Vec<&ConfigNode> = match node.name.as_str() {
            BEACONS_NODE => node.get_nodes(BEACON_NODE).collect(),
            BEACON_NODE => vec![node],
            _ => continue,
        };
        for record in records {
            match Beacon::try_from(record) {
                Ok(beacon) => {
                    if !beacon.center().is_within_bounds() {
                        warn!(
                            "Beacon {} has an out of range centre {}",
                            beacon.name(),
                            beacon.center()
                        );
                    }
                    beacons.push(beacon);
                }
                Err(e) => warn!(
                    "Skipping beacon record {:?}: {}",
                    record.get_value("name").unwrap_or("<unnamed>"),
                    e
                ),
            }
        }
    }
    Ok(beacons)
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::haversine;
    use tempfile::tempdir;

    const CAPE: (f64, f64) = (28.5, -80.6);

    fn cape() -> GeoPoint {
        GeoPoint::new(CAPE.0, CAPE.1)
    }

    const TWO_BEACONS: &str = "\
Beacons
{
\tBeacon
\t{
\t\tname = A
\t\tlat = 28.5
\t\tlon = -80.6
\t\trange = 50000
\t}
\tBeacon
\t{
\t\tname = B
\t\tlat = 28.7
\t\tlon = -80.6
\t\trange = 50000
\t}
}
";

    #[test]
    fn test_new_registry_is_empty() {
        let registry = BeaconRegistry::new();
        assert_eq!(registry.state(), RegistryState::Empty);
        assert!(registry.is_empty());
        assert_eq!(registry.policy(), MatchPolicy::FirstInRange);
        assert_eq!(
            registry.evaluate(&GeoPoint::new(-12.0, 44.0)),
            Decision::Blocked {
                nearest: None,
                distance_meters: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_create_default_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("GameData/NIMBY/Beacons.cfg");

        let mut registry = BeaconRegistry::new();
        registry.load_or_create_default(&path, cape()).unwrap();

        assert_eq!(registry.state(), RegistryState::Loaded);
        assert_eq!(registry.beacons(), &[Beacon::default_at(cape())]);
        assert_eq!(registry.beacons()[0].name(), "KSC");
        assert_eq!(registry.beacons()[0].range_meters(), 100_000.0);
        assert!(path.exists());

        let mut reloaded = BeaconRegistry::new();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded.beacons(), registry.beacons());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");
        fs::write(&path, TWO_BEACONS).unwrap();

        let mut registry = BeaconRegistry::new();
        registry.load_or_create_default(&path, cape()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), TWO_BEACONS);
    }

    #[test]
    fn test_missing_without_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");

        let mut registry = BeaconRegistry::new();
        let err = registry.load_beacons(&path, false, cape()).unwrap_err();

        assert!(matches!(err, LoadError::NotFound(p) if p == path));
        assert_eq!(registry.state(), RegistryState::Empty);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_beacons_creates_when_asked() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");

        let mut registry = BeaconRegistry::new();
        registry.load_beacons(&path, true, cape()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");
        fs::write(
            &path,
            "Beacons\n{\n\
             \tBeacon\n\t{\n\t\tname = Broken\n\t\tlat = 10\n\t\trange = 5000\n\t}\n\
             \tBeacon\n\t{\n\t\tname = Good\n\t\tlat = 10\n\t\tlon = 20\n\t\trange = 5000\n\t}\n\
             }\n",
        )
        .unwrap();

        let mut registry = BeaconRegistry::new();
        registry.load(&path).unwrap();

        assert_eq!(
            registry.beacons(),
            &[Beacon::new("Good", GeoPoint::new(10.0, 20.0), 5000.0)]
        );
    }

    #[test]
    fn test_parse_error_keeps_previous_beacons() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.cfg");
        let bad = dir.path().join("bad.cfg");
        fs::write(&good, TWO_BEACONS).unwrap();
        fs::write(&bad, "Beacons\n{\n\tBeacon\n\t{\n\t\tname = A\n}\n").unwrap();

        let mut registry = BeaconRegistry::new();
        registry.load(&good).unwrap();
        let before = registry.beacons().to_vec();

        let err = registry.load(&bad).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
        assert_eq!(registry.beacons(), before.as_slice());
        assert_eq!(registry.state(), RegistryState::Loaded);
    }

    #[test]
    fn test_read_error_keeps_state() {
        let dir = tempdir().unwrap();

        let mut registry = BeaconRegistry::new();
        // a directory exists but cannot be read as a file
        let err = registry.load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(registry.state(), RegistryState::Empty);
    }

    /// A dangling symlink reads as missing but cannot be written
    /// through.
    #[cfg(unix)]
    #[test]
    fn test_write_failure_still_adopts_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");
        std::os::unix::fs::symlink(dir.path().join("missing/Beacons.cfg"), &path).unwrap();

        let mut registry = BeaconRegistry::new();
        let err = registry.load_or_create_default(&path, cape()).unwrap_err();

        assert!(matches!(err, LoadError::Write { .. }));
        assert_eq!(registry.state(), RegistryState::Loaded);
        assert_eq!(registry.beacons(), &[Beacon::default_at(cape())]);
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.cfg");
        let second = dir.path().join("second.cfg");
        fs::write(&first, TWO_BEACONS).unwrap();
        fs::write(
            &second,
            "Beacon\n{\n\tname = Solo\n\tlat = 1\n\tlon = 2\n\trange = 3\n}\n",
        )
        .unwrap();

        let mut registry = BeaconRegistry::new();
        registry.load(&first).unwrap();
        assert_eq!(registry.len(), 2);
        registry.load(&second).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.beacons()[0].name(), "Solo");
    }

    #[test]
    fn test_byte_order_mark_file_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Beacons.cfg");
        fs::write(&path, format!("\u{feff}{}", TWO_BEACONS)).unwrap();

        let mut registry = BeaconRegistry::new();
        registry.load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.beacons()[0].name(), "A");
    }

    #[test]
    fn test_to_node_rejects_unwritable_name() {
        let registry = BeaconRegistry::from_beacons(vec![
            Beacon::default_at(cape()),
            Beacon::new("Pad {2}", cape(), 10.0),
        ]);
        assert!(matches!(
            registry.to_node(),
            Err(RecordError::Unwritable { field: "name", .. })
        ));
    }

    #[test]
    fn test_empty_collection_loads() {
        let beacons = parse_beacons("Beacons\n{\n}\n").unwrap();
        assert!(beacons.is_empty());

        let registry = BeaconRegistry::from_beacons(beacons);
        assert_eq!(registry.state(), RegistryState::Loaded);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_out_of_range_centre_is_kept() {
        let beacons =
            parse_beacons("Beacon\n{\n\tname = Pole\n\tlat = 95\n\tlon = 0\n\trange = 10\n}\n")
                .unwrap();
        assert_eq!(beacons.len(), 1);
        assert!(!beacons[0].center().is_within_bounds());
    }

    #[test]
    fn test_evaluate_uses_file_order() {
        let beacons = parse_beacons(TWO_BEACONS).unwrap();
        let target = GeoPoint::new(28.65, -80.6);

        let first = BeaconRegistry::from_beacons(beacons.clone());
        assert_eq!(first.evaluate(&target).beacon().map(Beacon::name), Some("A"));

        let mut nearest = BeaconRegistry::from_beacons(beacons);
        nearest.set_policy(MatchPolicy::NearestInRange);
        assert_eq!(nearest.evaluate(&target).beacon().map(Beacon::name), Some("B"));
    }

    #[test]
    fn test_evaluate_default_beacon() {
        let registry = BeaconRegistry::from_beacons(vec![Beacon::default_at(cape())]);
        assert!(registry.evaluate(&cape()).is_allowed());

        let delta_deg = (150_000.0 / haversine::EARTH_RADIUS_METERS).to_degrees();
        let far = GeoPoint::new(CAPE.0 - delta_deg, CAPE.1);
        match registry.evaluate(&far) {
            Decision::Blocked {
                nearest: Some(beacon),
                distance_meters,
            } => {
                assert_eq!(beacon.name(), "KSC");
                assert!((distance_meters / 150_000.0 - 1.0).abs() < 0.001);
            }
            other => panic!("expected blocked, got {:?}", other),
        }
    }
}
