//! # Adapters Module
//!
//! Infrastructure adapters implementing the ports. The HTTP adapter lives
//! with the terminal front end; this crate ships the in-memory backend
//! used by tests and offline demos.

pub mod memory;

pub use memory::{InMemoryBackend, Operation, RecordedCall};
