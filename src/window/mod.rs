//! Window sessions and the controller that switches between them.

pub mod background;
pub mod controller;
pub mod editor_window;
pub mod factory;
pub mod harness;
pub mod main_window;
pub mod surface;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::feature::FeatureConfig;
use crate::tui::Element;

pub use background::BackgroundWindow;
pub use controller::WindowController;
pub use editor_window::EditorWindow;
pub use factory::{DeskClockSessions, SessionFactory};
pub use harness::{FeatureHarness, HarnessSessions};
pub use main_window::MainWindow;
pub use surface::Surface;

/// Event ids emitted by window controls.
pub mod events {
    pub const MAIN_LAYOUT: &str = "-button.main.layout-";
    pub const MAIN_TOGGLE_24H: &str = "-button.main.24h-";
    pub const MAIN_EXIT: &str = "-button.main.exit-";

    pub const EDITOR_AVAILABLE_PREFIX: &str = "button.available.";
    pub const EDITOR_ACTIVE_PREFIX: &str = "button.active.";
    pub const EDITOR_ADD: &str = "button.addFeature";
    pub const EDITOR_REMOVE: &str = "button.removeFeature";
    pub const EDITOR_SAVE: &str = "-button.layouts.save-";
    pub const EDITOR_EXIT: &str = "button.exit";

    pub fn available_entry(index: usize) -> String {
        format!("{}{}", EDITOR_AVAILABLE_PREFIX, index)
    }

    pub fn active_entry(index: usize) -> String {
        format!("{}{}", EDITOR_ACTIVE_PREFIX, index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Background,
    Main,
    Editor,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindowKind::Background => "background",
            WindowKind::Main => "main",
            WindowKind::Editor => "editor",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventId {
    /// The read wait elapsed without user input
    Timeout,
    /// The window was closed by the user or the terminal
    Closed,
    /// The screen changed size and must be presented again
    Redraw,
    /// A control was activated
    Element(String),
}

/// One result of a backend read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub id: EventId,
    pub values: BTreeMap<String, String>,
}

impl WindowEvent {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(EventId::Timeout)
    }

    pub fn closed() -> Self {
        Self::new(EventId::Closed)
    }

    pub fn redraw() -> Self {
        Self::new(EventId::Redraw)
    }

    pub fn element(id: impl Into<String>) -> Self {
        Self::new(EventId::Element(id.into()))
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn element_id(&self) -> Option<&str> {
        match &self.id {
            EventId::Element(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_element(&self, id: &str) -> bool {
        self.element_id() == Some(id)
    }
}

/// Window-level request raised while handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Tick,
    Close,
    OpenEditor,
    Apply(Vec<FeatureConfig>),
    ToggleHourFormat,
}

impl Signal {
    /// Signals implied by the event itself, independent of any window.
    pub fn from_event(event: &WindowEvent) -> Option<Signal> {
        match event.id {
            EventId::Timeout => Some(Signal::Tick),
            EventId::Closed => Some(Signal::Close),
            EventId::Redraw | EventId::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    BackgroundOnly,
    MainActive,
    EditorActive,
    ShutDown,
}

/// One live window.
pub trait WindowSession {
    fn kind(&self) -> WindowKind;

    /// Read wait for this window; `None` blocks until input arrives.
    fn timeout(&self) -> Option<Duration>;

    /// Handle one event, optionally asking the controller for a transition.
    fn handle_event(&mut self, event: &WindowEvent) -> anyhow::Result<Option<Signal>>;

    /// Refresh not tied to user input.
    fn update(&mut self) -> anyhow::Result<()>;

    /// Commit pending visual changes. Returns how many were applied.
    fn finalize(&mut self) -> usize;

    fn view(&self) -> Element;

    fn surface(&self) -> &Surface;

    fn is_open(&self) -> bool;

    fn close(&mut self);
}

/// Source of events and sink for window views.
pub trait Backend {
    fn read(&mut self, timeout: Option<Duration>) -> anyhow::Result<WindowEvent>;

    fn present(&mut self, session: &dyn WindowSession) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_signals() {
        assert_eq!(Signal::from_event(&WindowEvent::timeout()), Some(Signal::Tick));
        assert_eq!(Signal::from_event(&WindowEvent::closed()), Some(Signal::Close));
        assert_eq!(Signal::from_event(&WindowEvent::element(events::MAIN_EXIT)), None);
        assert_eq!(Signal::from_event(&WindowEvent::redraw()), None);
    }

    #[test]
    fn test_element_ids() {
        let event = WindowEvent::element(events::available_entry(2));
        assert_eq!(event.element_id(), Some("button.available.2"));
        assert!(!WindowEvent::timeout().is_element(events::MAIN_EXIT));
    }
}
