//! Track model and source resolution seam.

pub mod models;
pub mod resolver;

pub use {
    models::Track,
    resolver::{DirectResolver, TrackResolver},
};
