//! Core types for larder.

pub mod generation;
pub mod message;
pub mod model_info;
pub mod recipe;
pub mod usage;

pub use generation::*;
pub use message::*;
pub use model_info::*;
pub use recipe::*;
pub use usage::*;
