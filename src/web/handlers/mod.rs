//! API handlers for the feedback relay.

pub mod feedback;

pub use feedback::*;
