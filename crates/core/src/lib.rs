//! Portfolio Core - Shared types library.
//!
//! This crate provides the types used across the portfolio components:
//! - `site` - The public single-page portfolio and its admin flow
//! - `integration-tests` - End-to-end scenarios against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, the admin session and content records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
