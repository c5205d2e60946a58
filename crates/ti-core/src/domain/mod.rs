pub mod account;
pub mod correlator;
pub mod decode;
pub mod edits;
pub mod errors;
pub mod hex;
pub mod layout;
pub mod node;
pub mod state;
pub mod text;
pub mod view_mode;
pub mod view_model;

pub use account::*;
pub use correlator::*;
pub use decode::*;
pub use edits::*;
pub use errors::*;
pub use hex::*;
pub use layout::*;
pub use node::*;
pub use state::*;
pub use text::*;
pub use view_mode::*;
pub use view_model::*;
