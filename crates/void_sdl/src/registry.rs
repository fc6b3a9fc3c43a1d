//! Descriptor registry
//!
//! Holds every loaded version of every state descriptor and resolves the
//! layout of a record from its (name, version) header.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::descriptor::StateDescriptor;
use crate::error::{Result, SdlError};
use crate::sdl_parser;

/// File extension of descriptor sources
pub const SDL_EXTENSION: &str = "sdl";

/// All known state descriptors, by name then version
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: BTreeMap<String, BTreeMap<u16, Arc<StateDescriptor>>>,
}

impl DescriptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor
    pub fn register(&mut self, descriptor: StateDescriptor) -> Result<Arc<StateDescriptor>> {
        let versions = self.descriptors.entry(descriptor.name.clone()).or_default();
        if versions.contains_key(&descriptor.version) {
            return Err(SdlError::DuplicateDescriptor {
                name: descriptor.name,
                version: descriptor.version,
            });
        }
        log::debug!("Registered state descriptor {} v{}", descriptor.name, descriptor.version);
        let descriptor = Arc::new(descriptor);
        versions.insert(descriptor.version, descriptor.clone());
        Ok(descriptor)
    }

    /// Look up an exact version
    pub fn get(&self, name: &str, version: u16) -> Result<Arc<StateDescriptor>> {
        self.descriptors
            .get(name)
            .and_then(|versions| versions.get(&version))
            .cloned()
            .ok_or_else(|| SdlError::UnknownDescriptor {
                name: name.to_string(),
                version,
            })
    }

    /// Look up the highest registered version
    pub fn latest(&self, name: &str) -> Result<Arc<StateDescriptor>> {
        self.descriptors
            .get(name)
            .and_then(|versions| versions.values().next_back())
            .cloned()
            .ok_or_else(|| SdlError::UnknownDescriptorName(name.to_string()))
    }

    /// Number of registered (name, version) pairs
    pub fn len(&self) -> usize {
        self.descriptors.values().map(BTreeMap::len).sum()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all descriptors, ordered by name then version
    pub fn iter(&self) -> impl Iterator<Item = &Arc<StateDescriptor>> {
        self.descriptors.values().flat_map(BTreeMap::values)
    }

    /// Parse `.sdl` source text and register every descriptor in it
    pub fn load_source(&mut self, source: &str) -> Result<usize> {
        let parsed = sdl_parser::parse(source)?;
        let count = parsed.len();
        for descriptor in parsed {
            self.register(descriptor)?;
        }
        Ok(count)
    }

    /// Load one `.sdl` file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SdlError::io(path, e))?;
        let count = self.load_source(&source)?;
        log::info!("Loaded {} state descriptors from {:?}", count, path);
        Ok(count)
    }

    /// Load every `.sdl` file in a directory (not recursive)
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| SdlError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SdlError::io(dir, e))?.path();
            let is_sdl = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(SDL_EXTENSION))
                .unwrap_or(false);
            if is_sdl && path.is_file() {
                paths.push(path);
            }
        }
        // Deterministic load order
        paths.sort();

        let mut total = 0;
        for path in paths {
            total += self.load_file(&path)?;
        }
        Ok(total)
    }

    /// Check that every nested `$Name` reference resolves
    pub fn validate(&self) -> Result<()> {
        for descriptor in self.iter() {
            for var in descriptor.vars.iter().filter(|v| v.is_state_descriptor()) {
                let nested = var
                    .state_desc
                    .as_deref()
                    .ok_or_else(|| SdlError::MissingNestedDescriptor(var.name.clone()))?;
                self.latest(nested)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::VarDescriptor;
    use crate::types::VarType;

    #[test]
    fn test_versions() {
        let mut registry = DescriptorRegistry::new();
        registry.register(StateDescriptor::new("Door", 1)).unwrap();
        registry.register(StateDescriptor::new("Door", 3)).unwrap();
        registry.register(StateDescriptor::new("Lock", 1)).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.latest("Door").unwrap().version, 3);
        assert_eq!(registry.get("Door", 1).unwrap().version, 1);
        assert!(matches!(
            registry.get("Door", 2),
            Err(SdlError::UnknownDescriptor { version: 2, .. })
        ));
        assert!(matches!(
            registry.latest("Window"),
            Err(SdlError::UnknownDescriptorName(_))
        ));
    }

    #[test]
    fn test_duplicate() {
        let mut registry = DescriptorRegistry::new();
        registry.register(StateDescriptor::new("Door", 1)).unwrap();
        assert!(matches!(
            registry.register(StateDescriptor::new("Door", 1)),
            Err(SdlError::DuplicateDescriptor { .. })
        ));
    }

    #[test]
    fn test_validate_nested() {
        let mut registry = DescriptorRegistry::new();
        registry
            .register(StateDescriptor::new("Door", 1).with_var(VarDescriptor::nested("locks", "Lock", None)))
            .unwrap();
        assert!(registry.validate().is_err());

        registry
            .register(StateDescriptor::new("Lock", 1).with_var(VarDescriptor::new("code", VarType::Int, 1)))
            .unwrap();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_load_source() {
        let mut registry = DescriptorRegistry::new();
        let count = registry
            .load_source("STATEDESC A { VERSION 1 VAR INT x[1] }\nSTATEDESC B { VERSION 4 }")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(registry.latest("B").unwrap().version, 4);
    }
}
