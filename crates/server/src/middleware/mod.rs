//! Request middleware and extractors.

pub mod auth;

pub use auth::{RequireAdmin, RequireAuth, RequireCustomer, RequireOwner};
