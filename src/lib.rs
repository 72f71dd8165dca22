//! Touch desk clock: positioned feature widgets on a grid, a layout editor
//! and the controller that switches between them.

pub mod cli;
pub mod editor;
pub mod error;
pub mod feature;
pub mod keys;
pub mod layout;
pub mod services;
pub mod settings;
pub mod tui;
pub mod window;

pub use error::{DeskClockError, Result};
