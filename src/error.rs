//! Error types
//!
//! Almost everything in a bingo session degrades to a no-op. The exceptions
//! are programmer errors (using physics before it exists) and bad settings.

use std::fmt;

/// Error type for controller and settings operations
#[derive(Debug)]
pub enum GameError {
    /// A ball body was requested before `initialize_physics` ran
    PhysicsNotInitialized,
    /// Settings JSON could not be parsed
    Settings(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PhysicsNotInitialized => {
                write!(f, "Physics world not initialized (call initialize_physics first)")
            }
            GameError::Settings(err) => write!(f, "Invalid settings: {}", err),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::PhysicsNotInitialized => None,
            GameError::Settings(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Settings(err)
    }
}
