//! Event fan-out between the player core and its listeners.

pub mod bus;

pub use bus::{EventBus, PlayerEvent};
