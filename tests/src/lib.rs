//! # Trie Inspector Test Suite
//!
//! End-to-end flows through `InspectorState` and `InspectorService`
//! against a scripted backend.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── gateway.rs   # ScriptedGateway: queued replies, recorded requests
//!     ├── fixtures.rs  # Trie payload builders
//!     └── flows.rs     # Register / stage / commit scenarios
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ti-tests
//! cargo test -p ti-tests integration::flows::
//! ```

pub mod integration;
