use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;

use crate::error::{DeskClockError, Result};

/// Separator placed between a base key and its numeric disambiguator.
pub const DISAMBIGUATOR_SEPARATOR: &str = "<#>:";

/// Upper bound on suffix attempts for a single base key.
pub const DEFAULT_SUFFIX_LIMIT: u64 = 1_000_000;

/// Identifier of one UI element, unique across every live feature instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalKey(String);

impl GlobalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a key that was not minted by a namespace.
    ///
    /// Used for window-level controls that never collide with feature
    /// elements.
    pub fn fixed(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for GlobalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GlobalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Registry of every element key handed out during the process lifetime.
///
/// Keys are never reclaimed: destroying a feature instance does not free
/// its keys, so rebuilding the same layout repeatedly produces ever longer
/// suffix counters.
#[derive(Debug)]
pub struct KeyNamespace {
    registered: HashSet<GlobalKey>,
    suffix_limit: u64,
}

impl Default for KeyNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyNamespace {
    pub fn new() -> Self {
        Self::with_suffix_limit(DEFAULT_SUFFIX_LIMIT)
    }

    pub fn with_suffix_limit(suffix_limit: u64) -> Self {
        Self {
            registered: HashSet::new(),
            suffix_limit,
        }
    }

    /// Mint a key for `base`.
    ///
    /// The first request returns `base` untouched; later ones append
    /// `<#>:N` with the smallest free `N`.
    pub fn allocate(&mut self, base: &str) -> Result<GlobalKey> {
        let mut candidate = base.to_string();
        let mut count = 0u64;

        while self.registered.contains(candidate.as_str()) {
            count += 1;
            if count > self.suffix_limit {
                return Err(DeskClockError::KeyExhausted {
                    base: base.to_string(),
                    attempts: count - 1,
                });
            }
            candidate = format!("{}{}{}", base, DISAMBIGUATOR_SEPARATOR, count);
        }

        if count > 0 {
            debug!("Key '{}' already taken, using '{}'", base, candidate);
        }

        let key = GlobalKey(candidate);
        self.registered.insert(key.clone());
        Ok(key)
    }

    /// Mint one key per local element name.
    pub fn allocate_all(&mut self, local_names: &[&'static str]) -> Result<ElementKeys> {
        let mut keys = HashMap::with_capacity(local_names.len());
        for name in local_names {
            let key = self.allocate(name)?;
            keys.insert(*name, key);
        }
        Ok(ElementKeys { keys })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registered.contains(key)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

impl std::borrow::Borrow<str> for GlobalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Mapping from a feature's local element names to its global keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementKeys {
    keys: HashMap<&'static str, GlobalKey>,
}

impl ElementKeys {
    pub fn get(&self, local: &str) -> Option<&GlobalKey> {
        self.keys.get(local)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &GlobalKey)> {
        self.keys.iter().map(|(local, key)| (*local, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocation_is_the_base_name() {
        let mut namespace = KeyNamespace::new();
        let key = namespace.allocate("time").unwrap();
        assert_eq!(key.as_str(), "time");
    }

    #[test]
    fn test_repeated_base_gets_distinct_suffixes() {
        let mut namespace = KeyNamespace::new();
        let first = namespace.allocate("time").unwrap();
        let second = namespace.allocate("time").unwrap();
        let third = namespace.allocate("time").unwrap();

        assert_ne!(first, second);
        assert_eq!(second.as_str(), "time<#>:1");
        assert_eq!(third.as_str(), "time<#>:2");
        assert_eq!(namespace.len(), 3);
    }

    #[test]
    fn test_suffix_skips_keys_registered_directly() {
        let mut namespace = KeyNamespace::new();
        namespace.allocate("ampm").unwrap();
        namespace.allocate("ampm<#>:1").unwrap();

        let key = namespace.allocate("ampm").unwrap();
        assert_eq!(key.as_str(), "ampm<#>:2");
    }

    #[test]
    fn test_suffix_limit_guards_runaway_growth() {
        let mut namespace = KeyNamespace::with_suffix_limit(2);
        namespace.allocate("time").unwrap();
        namespace.allocate("time").unwrap();
        namespace.allocate("time").unwrap();

        let err = namespace.allocate("time").unwrap_err();
        assert!(matches!(err, DeskClockError::KeyExhausted { attempts: 2, .. }));
    }

    #[test]
    fn test_allocate_all_keeps_instances_apart() {
        let mut namespace = KeyNamespace::new();
        let a = namespace.allocate_all(&["time", "ampm"]).unwrap();
        let b = namespace.allocate_all(&["time", "ampm"]).unwrap();

        for (local, key) in a.iter() {
            assert_ne!(Some(key), b.get(local));
        }
        assert_eq!(a.get("time").unwrap().as_str(), "time");
        assert_eq!(b.get("time").unwrap().as_str(), "time<#>:1");
    }
}
