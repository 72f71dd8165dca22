use thiserror::Error;

use crate::feature::Position;

/// Errors raised by the window and layout core.
///
/// Editor mistakes (a full active list, nothing highlighted) are not errors;
/// they surface as feedback text on the editor instead.
#[derive(Debug, Error)]
pub enum DeskClockError {
    /// A window session could not be created. Fatal during startup.
    #[error("failed to construct {window} window: {reason}")]
    Construction { window: String, reason: String },

    /// Two feature instances claim the same grid cell.
    #[error("layout error: {count} features placed at {position}")]
    Layout { position: Position, count: usize },

    /// Suffix disambiguation ran past its guard for a base key.
    #[error("no free key left for base '{base}' after {attempts} attempts")]
    KeyExhausted { base: String, attempts: u64 },

    /// A layout references a feature type missing from the registry.
    #[error("unknown feature type '{0}'")]
    UnknownFeature(String),

    /// Feature parameters could not be decoded.
    #[error("invalid options for feature '{type_id}': {source}")]
    InvalidConfig {
        type_id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DeskClockError {
    pub fn construction(window: impl Into<String>, reason: impl ToString) -> Self {
        DeskClockError::Construction {
            window: window.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors that only invalidate one layout build, leaving the previous
    /// main window usable.
    pub fn is_layout_fault(&self) -> bool {
        matches!(
            self,
            DeskClockError::Layout { .. }
                | DeskClockError::UnknownFeature(_)
                | DeskClockError::InvalidConfig { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DeskClockError>;
