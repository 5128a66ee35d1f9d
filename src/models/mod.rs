//! Repository data model shared by the cache, providers and the clone path

pub mod repository;

pub use repository::{Origin, Repository};
