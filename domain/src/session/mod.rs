//! Completion messages
//!
//! Role-tagged messages sent to the completion endpoint. A generation call is
//! always `[system, user]`.

pub mod entities;

pub use entities::{Message, Role};
