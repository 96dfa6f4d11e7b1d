//! Request extractors and the middleware that feeds them

pub mod context;

pub use context::attach_request_context;
