//! Elemental Snake - a grid snake game with elemental food and reactions
//!
//! This library provides:
//! - Core simulation: snake, food registries, element table (game module)
//! - Error types shared by the simulation and config loading (error module)
//! - Terminal front end pieces: input mapping, rendering, session metrics
//!   and the interactive mode driving them

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
