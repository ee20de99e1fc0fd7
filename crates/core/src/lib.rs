//! Shoprate Core - Shared types library.
//!
//! This crate provides common types used across all Shoprate components:
//! - `server` - REST API serving admins, store owners, and customers
//! - `integration-tests` - End-to-end tests against the API surface
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and rating values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
