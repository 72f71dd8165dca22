use std::collections::HashMap;

use ratatui::layout::Rect;

/// Event ids of the controls drawn in the last frame, by screen area and
/// by hotkey.
#[derive(Debug, Default)]
pub struct InteractionRegistry {
    click_targets: Vec<(Rect, String)>,
    hotkeys: HashMap<char, String>,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_click(&mut self, rect: Rect, id: impl Into<String>) {
        self.click_targets.push((rect, id.into()));
    }

    pub fn register_hotkey(&mut self, key: char, id: impl Into<String>) {
        self.hotkeys.insert(key.to_ascii_lowercase(), id.into());
    }

    pub fn find_click(&self, x: u16, y: u16) -> Option<&str> {
        // Later registrations are drawn on top.
        self.click_targets
            .iter()
            .rev()
            .find(|(rect, _)| point_in_rect(x, y, *rect))
            .map(|(_, id)| id.as_str())
    }

    pub fn find_hotkey(&self, key: char) -> Option<&str> {
        self.hotkeys.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.click_targets.clear();
        self.hotkeys.clear();
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_hits_topmost_target() {
        let mut registry = InteractionRegistry::new();
        registry.register_click(Rect::new(0, 0, 10, 3), "outer");
        registry.register_click(Rect::new(2, 1, 4, 1), "inner");

        assert_eq!(registry.find_click(3, 1), Some("inner"));
        assert_eq!(registry.find_click(0, 0), Some("outer"));
        assert_eq!(registry.find_click(10, 0), None);
    }

    #[test]
    fn test_hotkeys_ignore_case() {
        let mut registry = InteractionRegistry::new();
        registry.register_hotkey('L', "-button.main.layout-");
        assert_eq!(registry.find_hotkey('l'), Some("-button.main.layout-"));

        registry.clear();
        assert_eq!(registry.find_hotkey('l'), None);
    }
}
