//! Persistence layer for buzzdeck.
//!
//! A [`Store`] exposes typed repositories (study sets, game history,
//! activity feed, rating, profile) over an injected [`KvBackend`].
//! [`MemoryBackend`] backs tests, [`JsonFileBackend`] backs the CLI.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{JsonFileBackend, KvBackend, MemoryBackend};
pub use error::StoreError;
pub use store::Store;
