//! Thin I/O collaborators: time formatting, network diagnostics, web
//! scraping and shell commands. Failures are reported as sentinel values
//! so the window loop never stalls on them.

pub mod network;
pub mod sys;
pub mod time;
pub mod web;

pub use network::{Interfaces, NO_CONNECTION};
pub use time::{ClockReading, Meridiem, TimeSource};
