use std::time::Duration;

use log::debug;

use super::{BackgroundWindow, EditorWindow, MainWindow, WindowSession};
use crate::editor::CompositionEditor;
use crate::error::{DeskClockError, Result};
use crate::feature::{FeatureConfig, FeatureContext, FeatureRegistry};
use crate::keys::KeyNamespace;
use crate::settings::Settings;

/// Builds the sessions the controller switches between.
pub trait SessionFactory {
    fn background(&mut self) -> Result<Box<dyn WindowSession>>;

    fn main(&mut self, layout: &[FeatureConfig], settings: &Settings) -> Result<Box<dyn WindowSession>>;

    fn editor(&mut self, settings: &Settings) -> Result<Box<dyn WindowSession>>;
}

/// Production sessions backed by the feature registry and one key namespace
/// shared by every main window built during the process.
pub struct DeskClockSessions {
    registry: FeatureRegistry,
    namespace: KeyNamespace,
}

impl DeskClockSessions {
    pub fn new(registry: FeatureRegistry, namespace: KeyNamespace) -> Self {
        Self {
            registry,
            namespace,
        }
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }
}

impl Default for DeskClockSessions {
    fn default() -> Self {
        Self::new(FeatureRegistry::with_builtin(), KeyNamespace::new())
    }
}

impl SessionFactory for DeskClockSessions {
    fn background(&mut self) -> Result<Box<dyn WindowSession>> {
        Ok(Box::new(BackgroundWindow::new()))
    }

    fn main(&mut self, layout: &[FeatureConfig], settings: &Settings) -> Result<Box<dyn WindowSession>> {
        let context = FeatureContext {
            enable_24_hour: settings.enable_24_hour,
        };
        let window = MainWindow::build(
            layout,
            &self.registry,
            &context,
            &mut self.namespace,
            Duration::from_millis(settings.tick_interval_ms),
        )?;
        debug!("{} element keys registered so far", self.namespace.len());
        Ok(Box::new(window))
    }

    fn editor(&mut self, settings: &Settings) -> Result<Box<dyn WindowSession>> {
        if settings.editor_rows == 0 || settings.editor_cols == 0 {
            return Err(DeskClockError::construction(
                "editor",
                format!(
                    "grid of {}x{} has no slots",
                    settings.editor_rows, settings.editor_cols
                ),
            ));
        }
        if self.registry.is_empty() {
            return Err(DeskClockError::construction("editor", "no feature types registered"));
        }

        let editor = CompositionEditor::new(
            self.registry.descriptors(),
            settings.editor_rows,
            settings.editor_cols,
        );
        Ok(Box::new(EditorWindow::new(editor)))
    }
}
