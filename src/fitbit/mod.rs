//! Fitbit REST API clients.

pub mod weight;

pub use weight::{WeightClient, WeightConfig};
