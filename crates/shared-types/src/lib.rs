//! # Shared Types Crate
//!
//! Request and response shapes of the trie backend's HTTP API.
//!
//! ## Design Principles
//!
//! - **Wire fidelity**: field names follow the backend's camelCase JSON.
//! - **Lenient decoding**: every optional field tolerates `null`, an empty
//!   string, or omission, because the backend marshals with `omitempty`.
//! - **No interpretation**: these types carry data only. Normalization into
//!   the inspector's node model lives in `ti-core`.

pub mod errors;
pub mod requests;
pub mod responses;
pub mod trie;

pub use errors::ErrorEnvelope;
pub use requests::*;
pub use responses::*;
pub use trie::*;
