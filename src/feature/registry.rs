use log::debug;

use super::{Feature, FeatureConfig, FeatureContext, FeatureInstance};
use crate::error::{DeskClockError, Result};
use crate::keys::KeyNamespace;

/// Catalog entry shown in the layout editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDescriptor {
    pub type_id: String,
    pub description: String,
}

impl FeatureDescriptor {
    pub fn new(type_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            description: description.into(),
        }
    }
}

/// Builds a variant from its configuration. Keys are minted afterwards.
pub type FeatureFactory = fn(&FeatureConfig, &FeatureContext) -> Result<Box<dyn Feature>>;

struct RegisteredFeature {
    descriptor: FeatureDescriptor,
    factory: FeatureFactory,
}

/// Explicit table of feature variants, populated at startup.
///
/// Registration order is the order the editor lists the catalog in.
#[derive(Default)]
pub struct FeatureRegistry {
    entries: Vec<RegisteredFeature>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every variant shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            super::clock::TYPE_ID,
            super::clock::DESCRIPTION,
            super::clock::create,
        );
        registry.register(
            super::network::TYPE_ID,
            super::network::DESCRIPTION,
            super::network::create,
        );
        registry.register(
            super::public_ip::TYPE_ID,
            super::public_ip::DESCRIPTION,
            super::public_ip::create,
        );
        registry
    }

    /// Add or replace a variant.
    pub fn register(
        &mut self,
        type_id: impl Into<String>,
        description: impl Into<String>,
        factory: FeatureFactory,
    ) {
        let descriptor = FeatureDescriptor::new(type_id, description);
        debug!("Registering feature type '{}'", descriptor.type_id);

        match self
            .entries
            .iter_mut()
            .find(|entry| entry.descriptor.type_id == descriptor.type_id)
        {
            Some(entry) => {
                entry.descriptor = descriptor;
                entry.factory = factory;
            }
            None => self.entries.push(RegisteredFeature { descriptor, factory }),
        }
    }

    pub fn descriptors(&self) -> Vec<FeatureDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn descriptor(&self, type_id: &str) -> Option<&FeatureDescriptor> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.type_id == type_id)
            .map(|entry| &entry.descriptor)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.descriptor(type_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Two-phase construction: the factory builds the variant, then the
    /// instance mints its element keys from `namespace`.
    pub fn instantiate(
        &self,
        config: &FeatureConfig,
        context: &FeatureContext,
        namespace: &mut KeyNamespace,
    ) -> Result<FeatureInstance> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.descriptor.type_id == config.type_id)
            .ok_or_else(|| DeskClockError::UnknownFeature(config.type_id.clone()))?;

        let behavior = (entry.factory)(config, context)?;
        FeatureInstance::new(config.clone(), behavior, namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::ElementKeys;
    use crate::tui::Element;
    use crate::window::Surface;

    struct Label;

    impl Feature for Label {
        fn local_keys(&self) -> &'static [&'static str] {
            &["label"]
        }

        fn fragment(&self, _keys: &ElementKeys) -> Element {
            Element::text("label")
        }

        fn tick(&mut self, _keys: &ElementKeys, _surface: &mut Surface) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn create_label(_config: &FeatureConfig, _context: &FeatureContext) -> Result<Box<dyn Feature>> {
        Ok(Box::new(Label))
    }

    #[test]
    fn test_builtin_catalog_order() {
        let registry = FeatureRegistry::with_builtin();
        let ids: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.type_id)
            .collect();
        assert_eq!(ids, vec!["Clock", "Network", "PublicIp"]);
    }

    #[test]
    fn test_register_replaces_existing_type() {
        let mut registry = FeatureRegistry::new();
        registry.register("Label", "first", create_label);
        registry.register("Label", "second", create_label);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.descriptor("Label").unwrap().description, "second");
    }

    #[test]
    fn test_instantiate_mints_unique_keys() {
        let mut registry = FeatureRegistry::new();
        registry.register("Label", "Static label", create_label);
        let mut namespace = KeyNamespace::new();
        let context = FeatureContext::default();

        let a = registry
            .instantiate(&FeatureConfig::new("Label", 0, 0), &context, &mut namespace)
            .unwrap();
        let b = registry
            .instantiate(&FeatureConfig::new("Label", 0, 1), &context, &mut namespace)
            .unwrap();

        assert_eq!(a.keys().get("label").unwrap().as_str(), "label");
        assert_eq!(b.keys().get("label").unwrap().as_str(), "label<#>:1");
    }

    #[test]
    fn test_instantiate_unknown_type() {
        let registry = FeatureRegistry::new();
        let mut namespace = KeyNamespace::new();
        let err = registry
            .instantiate(
                &FeatureConfig::new("Weather", 0, 0),
                &FeatureContext::default(),
                &mut namespace,
            )
            .unwrap_err();
        assert!(matches!(err, DeskClockError::UnknownFeature(t) if t == "Weather"));
    }
}
