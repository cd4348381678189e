//! Web API module for the feedback relay.
//!
//! Exposes `POST /feedback`, which validates the submission, hands it to
//! the mail dispatcher, and maps the outcome to a fixed HTTP response.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
