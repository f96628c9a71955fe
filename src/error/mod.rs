//! Error handling for the player core.

pub mod domain;

pub use domain::PlayerError;
