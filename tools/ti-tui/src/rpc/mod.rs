//! HTTP adapter for the trie backend.

mod client;

pub use client::HttpGateway;
