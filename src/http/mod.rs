//! Directory HTTP API
//!
//! Member listing, filtering, admin edits, CSV exchange and board building
//! over a shared roster.

pub mod handler;
pub mod server;

pub use server::{AppState, HttpServer};
