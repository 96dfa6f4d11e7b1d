//! Gopher API Core Library
//!
//! Error model, request context and the repository port shared by every
//! storage backend.

// Re-export pure types from gopher-types
pub use gopher_types::*;

pub mod context;
pub mod error;
pub mod ports;

pub use context::RequestContext;
pub use error::{GopherError, Result};
pub use ports::GopherRepository;
