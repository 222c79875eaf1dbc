//! # Taskboard Shared Library
//!
//! Domain types, rules and persistence for the task-board backend. The API
//! server is a thin HTTP layer over the [`service`] operations.
//!
//! ## Module Organization
//!
//! - `models`: database models and their SQL operations
//! - `rules`: membership, authorization and validation rules
//! - `store`: the `EntityStore` contract with Postgres and in-memory backends
//! - `service`: one function per API operation, combining rules and store
//! - `auth`: password hashing, tokens, request actor extraction
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod rules;
pub mod service;
pub mod store;

/// Current version of the taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
