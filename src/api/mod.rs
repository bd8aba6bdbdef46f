//! HTTP surface: two read-only data endpoints plus a capability message.
//! Run with `ivdar-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
