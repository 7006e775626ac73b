//! HTTP Transport
//!
//! JSON request/response surface over the validator.

pub mod handlers;
pub mod server;

pub use handlers::{AppState, ValidateRequest, router};
pub use server::serve;
