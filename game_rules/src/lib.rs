//! # Game Rules
//!
//! The "World Bible" crate - characters, monster templates, weapons, spells
//! and dice. This crate is the long-lived character layer that combat
//! encounters are built from and synchronised back into. It does not contain
//! any combat state or AI logic.

pub mod entities;
pub mod error;
pub mod mechanics;
pub mod spells;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use spells::*;
