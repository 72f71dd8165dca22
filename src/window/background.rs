use std::time::Duration;

use log::debug;

use super::{Surface, WindowEvent, WindowKind, WindowSession, Signal};
use crate::tui::Element;

/// Blank idle window kept behind the main display.
#[derive(Debug, Default)]
pub struct BackgroundWindow {
    surface: Surface,
    closed: bool,
}

impl BackgroundWindow {
    pub fn new() -> Self {
        debug!("Background window created");
        Self::default()
    }
}

impl WindowSession for BackgroundWindow {
    fn kind(&self) -> WindowKind {
        WindowKind::Background
    }

    fn timeout(&self) -> Option<Duration> {
        None
    }

    fn handle_event(&mut self, _event: &WindowEvent) -> anyhow::Result<Option<Signal>> {
        Ok(None)
    }

    fn update(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn finalize(&mut self) -> usize {
        self.surface.finalize()
    }

    fn view(&self) -> Element {
        Element::Spacer
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        debug!("Background window closed");
        self.closed = true;
    }
}
