//! # ti-core
//!
//! Core of the trie inspector: account registry, staged storage edits,
//! commit coordination and the trie view-model with its text and tree
//! projections.
//!
//! ## Layout
//!
//! ```text
//!  [ti-tui] ──key events──→ InspectorState ──GatewayCall──→ InspectorService
//!                               ↑                                 │
//!                               └──────────Completion─────────────┤
//!                                                                 ↓
//!                                                    BackendGateway (port)
//!                                                     ├─ HttpGateway (ti-tui)
//!                                                     └─ InMemoryBackend
//! ```
//!
//! ## Guarantees
//!
//! - Edits are kept per account and survive a failed commit
//! - At most one commit per account is in flight; a second one is `Busy`
//! - Malformed trie data degrades to an empty view-model, never a panic

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::*;
pub use domain::*;
pub use ports::*;
pub use service::*;
