//! Core types for the portfolio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod admin;
pub mod content;
pub mod email;
pub mod id;
pub mod session;

pub use admin::AdminIdentity;
pub use content::{Certification, ContentItem, Project};
pub use email::{Email, EmailError};
pub use id::*;
pub use session::Session;
