//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Outbound (Driven)**: the trie backend the inspector talks to

pub mod gateway;

pub use gateway::{BackendGateway, GatewayError};
