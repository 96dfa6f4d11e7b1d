//! Storage layer
//!
//! Three interchangeable implementations of `GopherRepository`: an in-memory
//! map, an embedded SQLite database and Redis.

pub mod db;
pub mod memory;
pub mod redis;

#[cfg(test)]
mod contract;

pub use db::SqliteRepository;
pub use memory::MemoryRepository;
pub use self::redis::RedisRepository;
