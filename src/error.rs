//! Error types for the simulation and its configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::Position;

/// Why a snake could not advance.
///
/// `OutOfBounds` and `SelfCollision` are fatal: the snake is dead afterwards.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("snake left the grid at ({}, {})", .0.x, .0.y)]
    OutOfBounds(Position),

    #[error("snake ran into itself at ({}, {})", .0.x, .0.y)]
    SelfCollision(Position),

    #[error("snake is dead")]
    NotAlive,

    #[error("snake has no segments")]
    Empty,
}

impl MoveError {
    /// True for the failures that end the snake's life
    pub fn is_fatal(&self) -> bool {
        matches!(self, MoveError::OutOfBounds(_) | MoveError::SelfCollision(_))
    }
}

/// Errors raised while loading game or element configuration files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
