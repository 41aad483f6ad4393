pub mod engine;

pub use crate::error::{Result, SapError};
pub use engine::Sap;
