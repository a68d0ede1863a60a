//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod roles;
mod server;

pub use roles::{ADMIN_ROLE, ROLE_HEADER};
pub use server::HttpServer;
