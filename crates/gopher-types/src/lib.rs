//! Gopher Types - Pure type definitions
//!
//! This crate contains only the plain data types of the gopher API, with no
//! async runtime or storage dependencies.

pub mod gopher;

pub use gopher::*;
