//! Core request and response types.

pub mod generation;
pub mod stream;
pub mod usage;

pub use generation::*;
pub use stream::*;
pub use usage::*;
