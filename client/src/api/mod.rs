//! API module
//!
//! Wire types and transport for the `/process_query/` backend endpoint

pub mod client;
pub mod types;

pub use client::{HttpTransport, QueryTransport};
pub use types::{QueryOutcome, QueryResponse, RemainingRequests};
