//! Version registry mapping format versions to handler constructors.
//!
//! The registry is an explicit value built once at startup and handed to the
//! [`Codec`](crate::Codec); there is no global table.
//!
//! # Example
//!
//! ```ignore
//! use spritepak::registry::VersionRegistry;
//! use spritepak::types::Version;
//!
//! let registry = VersionRegistry::with_defaults();
//! let handler = registry.handler(Version::Ver2)?;
//! let album = handler.decode(&bytes)?;
//! ```

use std::collections::BTreeMap;

use crate::error::{PakError, Result};
use crate::handler::{ContainerHandler, FirstHandler, FourthHandler, LegacyHandler, SecondHandler};
use crate::types::Version;

/// Constructor for a version's handler.
pub type HandlerFactory = fn() -> Box<dyn ContainerHandler>;

/// Version to handler map.
#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
    factories: BTreeMap<Version, HandlerFactory>,
}

impl VersionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(Version::Legacy, || Box::new(LegacyHandler))
            .register(Version::Ver1, || Box::new(FirstHandler))
            .register(Version::Ver2, || Box::new(SecondHandler))
            .register(Version::Ver4, || Box::new(FourthHandler));
        registry
    }

    /// Register a handler. An existing registration for `version` is replaced.
    pub fn register(&mut self, version: Version, factory: HandlerFactory) -> &mut Self {
        self.factories.insert(version, factory);
        self
    }

    /// Look up the constructor for `version`.
    pub fn resolve(&self, version: Version) -> Result<HandlerFactory> {
        self.factories
            .get(&version)
            .copied()
            .ok_or_else(|| PakError::UnknownVersion {
                version: version.to_string(),
            })
    }

    /// Construct the handler for `version`.
    pub fn handler(&self, version: Version) -> Result<Box<dyn ContainerHandler>> {
        self.resolve(version).map(|factory| factory())
    }

    /// Registered versions, in tag order.
    pub fn versions(&self) -> impl Iterator<Item = Version> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = VersionRegistry::with_defaults();
        let versions: Vec<Version> = registry.versions().collect();
        assert_eq!(
            versions,
            vec![Version::Legacy, Version::Ver1, Version::Ver2, Version::Ver4]
        );
        for version in versions {
            assert_eq!(registry.handler(version).unwrap().version(), version);
        }
    }

    #[test]
    fn test_unregistered_version() {
        let registry = VersionRegistry::with_defaults();
        let err = registry.resolve(Version::Ver5).err().unwrap();
        assert!(matches!(err, PakError::UnknownVersion { .. }));
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = VersionRegistry::new();
        registry.register(Version::Ver2, || Box::new(FirstHandler));
        registry.register(Version::Ver2, || Box::new(SecondHandler));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.handler(Version::Ver2).unwrap().version(), Version::Ver2);
    }

    #[test]
    fn test_empty_registry() {
        let registry = VersionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.handler(Version::Legacy).is_err());
    }
}
