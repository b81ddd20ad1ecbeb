//! Configuration components
//!
//! One small struct per concern, each with its own defaults.

pub mod chat;
pub mod features;
pub mod tools;
pub mod web;

pub use chat::*;
pub use features::*;
pub use tools::*;
pub use web::*;
