//! HTTP handlers

pub mod gophers;
pub mod health;

pub use health::health;
