//! LSP Protocol Implementation
//!
//! Editor transport: publishes snippet diagnostics and offers the corrected text as a quick fix.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;
pub use server::serve;
