//! An Axum instance of the drs-rs server.
//!

pub mod error;
pub mod handlers;
pub mod server;
