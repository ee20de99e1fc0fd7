//! Shoprate REST API - store ratings with role-based access.
//!
//! Customers rate stores on a 1-5 scale, store owners watch their own
//! aggregate, and admins manage the accounts and the store catalog. The
//! ledger keeps at most one rating per (user, store) pair; every average
//! is computed live at read time.
//!
//! The crate is a library so the HTTP surface can be exercised in-process
//! by the integration tests; the `shoprate-server` binary is a thin
//! wrapper around [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
