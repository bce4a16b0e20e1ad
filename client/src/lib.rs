//! Cricket Chat Client Library
//!
//! Client side of a natural-language cricket statistics assistant: session
//! state, response mapping and the HTTP transport to the query backend.
//! The terminal front end is in `src/bin/cricket_chat.rs`.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ChatError, ConfigError, TransportError};
