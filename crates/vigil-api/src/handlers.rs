//! Request handlers.

pub mod alerts;
pub mod detect;
pub mod health;

pub use alerts::*;
pub use detect::*;
pub use health::*;
