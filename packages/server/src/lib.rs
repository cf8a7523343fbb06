//! Network front end and process wiring for the lookup service.

pub mod cli;
pub mod http;

pub use cli::Args;
pub use http::{AppState, LookupResponse, router};
