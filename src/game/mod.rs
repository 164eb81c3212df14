//! Core game logic for Elemental Snake
//!
//! Everything here is free of I/O and rendering. The snake, the two food
//! registries and the phase machine can be driven programmatically by any
//! front end; [`GameEngine`] ties them together.

pub mod catalog;
pub mod config;
pub mod direction;
pub mod element;
pub mod element_registry;
pub mod engine;
pub mod food;
pub mod list;
pub mod snake;
pub mod spawn;
pub mod state;

// Re-export commonly used types
pub use catalog::FoodCatalog;
pub use config::GameConfig;
pub use direction::Direction;
pub use element::{Element, ElementEffect, ElementReaction, ElementTable, ReactionKind};
pub use element_registry::{ElementFood, ElementFoodId, ElementRegistry};
pub use engine::{ActiveEffect, Consumed, GameEngine, ReactionEvent, TickOutcome};
pub use food::{Food, FoodId, FoodRegistry, FoodTag};
pub use list::{EntityList, NodeId};
pub use snake::{Segment, Snake};
pub use spawn::{MAX_PLACEMENT_ATTEMPTS, Occupancy, find_free_cell};
pub use state::{GameState, Phase, Position};
