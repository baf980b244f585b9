//! Automaton-specific error types.

use hy_core::{ModeId, TransitionId};

pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Automaton construction and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// A mode with this name was already added.
    DuplicateMode { name: String },

    /// A mode name is empty or contains a character reserved by the sample protocol.
    InvalidModeName { name: String },

    /// No mode with this name exists.
    UnknownMode { name: String },

    /// A transition refers to a mode ID that doesn't exist.
    InvalidModeRef {
        transition: TransitionId,
        mode: ModeId,
    },

    /// A variable name was declared twice.
    DuplicateVariable { name: String },
}

impl std::fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonError::DuplicateMode { name } => {
                write!(f, "Mode '{}' is already defined", name)
            }
            AutomatonError::InvalidModeName { name } => {
                write!(
                    f,
                    "Mode name '{}' is empty or contains one of ',', ';', '|', '!'",
                    name
                )
            }
            AutomatonError::UnknownMode { name } => {
                write!(f, "Unknown mode '{}'", name)
            }
            AutomatonError::InvalidModeRef { transition, mode } => {
                write!(f, "{} refers to non-existent {}", transition, mode)
            }
            AutomatonError::DuplicateVariable { name } => {
                write!(f, "Variable '{}' is declared more than once", name)
            }
        }
    }
}

impl std::error::Error for AutomatonError {}
