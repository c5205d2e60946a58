pub mod fixtures;
pub mod gateway;

mod flows;

pub use gateway::{Request, ScriptedGateway};
