//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string::preview`]: character-safe text previews

pub mod error;
pub mod string;
