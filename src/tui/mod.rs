pub mod element;
pub mod renderer;
pub mod terminal;
pub mod theme;

pub use element::{Element, LayoutConstraint, TextRole};
pub use renderer::{InteractionRegistry, Renderer};
pub use terminal::TerminalBackend;
pub use theme::{Theme, ThemeVariant};
