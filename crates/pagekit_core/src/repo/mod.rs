//! Repository layer: generic table access over one SQLite connection.
//!
//! # Responsibility
//! - Expose CRUD operations parameterized by table name.
//! - Keep SQL text construction inside the persistence boundary.
//!
//! # Invariants
//! - Caller values are always bound as statement parameters.
//! - Absence of a row is `Ok(None)`, distinct from store failures.

pub mod record_store;
