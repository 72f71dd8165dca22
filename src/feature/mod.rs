//! Positioned, pluggable display features.
//!
//! A feature variant implements [`Feature`]; a [`FeatureInstance`] pairs a
//! variant with its grid position and the element keys minted for it.

pub mod clock;
pub mod network;
pub mod public_ip;
mod refresh;
pub mod registry;

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DeskClockError, Result};
use crate::keys::{ElementKeys, GlobalKey, KeyNamespace};
use crate::tui::Element;
use crate::window::{Surface, WindowEvent};

pub use registry::{FeatureDescriptor, FeatureFactory, FeatureRegistry};

/// Grid coordinate of a feature.
///
/// Ordering is a dominance order: `a < b` only when both the row and the
/// column of `a` are strictly smaller. Positions that differ in just one
/// coordinate, or that pull in opposite directions, are incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.row < other.row && self.col < other.col {
            Some(Ordering::Less)
        } else if self.row > other.row && self.col > other.col {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable insertion sort driven only by `<` of the dominance order.
///
/// An element moves left past its neighbour only when it is strictly
/// dominated by it, so incomparable items keep their input order.
pub fn dominance_sort<T>(items: &mut [T], position: impl Fn(&T) -> Position) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && position(&items[j]) < position(&items[j - 1]) {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Serializable description of one feature on the main window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureConfig {
    pub type_id: String,
    pub position: Position,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl FeatureConfig {
    pub fn new(type_id: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            type_id: type_id.into(),
            position: Position::new(row, col),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Decode the parameter map into a variant's option struct.
    pub fn options<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.params.clone())).map_err(|source| {
            DeskClockError::InvalidConfig {
                type_id: self.type_id.clone(),
                source,
            }
        })
    }
}

/// Values a factory may consult while building a variant.
#[derive(Debug, Clone, Default)]
pub struct FeatureContext {
    pub enable_24_hour: bool,
}

/// Capability set every feature variant provides.
pub trait Feature {
    /// Local names of the elements this variant draws.
    fn local_keys(&self) -> &'static [&'static str];

    /// Window-specific setup, run once the instance sits on a surface.
    fn attach(&mut self, _keys: &ElementKeys, _surface: &mut Surface) {}

    /// Visual fragment for the layout grid.
    fn fragment(&self, keys: &ElementKeys) -> Element;

    /// Refresh not tied to user input; called once per timeout tick.
    fn tick(&mut self, keys: &ElementKeys, surface: &mut Surface) -> anyhow::Result<()>;

    /// React to a window event.
    fn handle_event(
        &mut self,
        _event: &WindowEvent,
        _keys: &ElementKeys,
        _surface: &mut Surface,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Look up the global key minted for `local`.
pub(crate) fn element_key<'a>(keys: &'a ElementKeys, local: &str) -> anyhow::Result<&'a GlobalKey> {
    keys.get(local)
        .ok_or_else(|| anyhow::anyhow!("no element key minted for '{}'", local))
}

/// A configured feature placed on the grid with its own element keys.
pub struct FeatureInstance {
    config: FeatureConfig,
    keys: ElementKeys,
    behavior: Box<dyn Feature>,
}

impl FeatureInstance {
    /// Mint keys for every element the variant asks for and wrap it.
    pub fn new(
        config: FeatureConfig,
        behavior: Box<dyn Feature>,
        namespace: &mut KeyNamespace,
    ) -> Result<Self> {
        let keys = namespace.allocate_all(behavior.local_keys())?;
        Ok(Self {
            config,
            keys,
            behavior,
        })
    }

    pub fn type_id(&self) -> &str {
        &self.config.type_id
    }

    pub fn position(&self) -> Position {
        self.config.position
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    pub fn keys(&self) -> &ElementKeys {
        &self.keys
    }

    pub fn attach(&mut self, surface: &mut Surface) {
        self.behavior.attach(&self.keys, surface);
    }

    pub fn fragment(&self) -> Element {
        self.behavior.fragment(&self.keys)
    }

    pub fn tick(&mut self, surface: &mut Surface) -> anyhow::Result<()> {
        self.behavior.tick(&self.keys, surface)
    }

    pub fn handle_event(&mut self, event: &WindowEvent, surface: &mut Surface) -> anyhow::Result<()> {
        self.behavior.handle_event(event, &self.keys, surface)
    }
}

impl fmt::Debug for FeatureInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureInstance")
            .field("type_id", &self.config.type_id)
            .field("position", &self.config.position)
            .field("keys", &self.keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominance_less_requires_both_coordinates() {
        assert!(Position::new(0, 0) < Position::new(1, 1));
        assert!(Position::new(0, 1) < Position::new(1, 2));
        // Equal columns never dominate.
        assert!(!(Position::new(0, 1) < Position::new(1, 1)));
        assert!(Position::new(2, 3) > Position::new(1, 1));
    }

    #[test]
    fn test_dominance_order_is_partial() {
        let a = Position::new(0, 1);
        let b = Position::new(1, 0);

        assert_eq!(a.partial_cmp(&b), None);
        assert!(!(a < b));
        assert!(!(a > b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_row_positions_are_incomparable() {
        let a = Position::new(0, 0);
        let b = Position::new(0, 1);
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
    }

    #[test]
    fn test_dominance_sort_keeps_incomparable_input_order() {
        let mut items = vec![Position::new(0, 1), Position::new(0, 0)];
        dominance_sort(&mut items, |p| *p);
        assert_eq!(items, vec![Position::new(0, 1), Position::new(0, 0)]);
    }

    #[test]
    fn test_dominance_sort_moves_dominated_items_forward() {
        let mut items = vec![Position::new(1, 1), Position::new(0, 0), Position::new(2, 2)];
        dominance_sort(&mut items, |p| *p);
        assert_eq!(
            items,
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_feature_config_options_ignore_unknown_params() {
        #[derive(Deserialize)]
        struct Options {
            #[serde(default)]
            utc_offset_hours: i32,
        }

        let config = FeatureConfig::new("Clock", 0, 0)
            .with_param("utc_offset_hours", -3)
            .with_param("colour", "amber");
        let options: Options = config.options().unwrap();
        assert_eq!(options.utc_offset_hours, -3);
    }
}
