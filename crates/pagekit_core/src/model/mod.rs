//! Data model shared by the store and the page layer.
//!
//! # Responsibility
//! - Define the schema-less row shape returned and accepted by the store.
//!
//! # Invariants
//! - Values are a closed set of scalar types; no dynamic typing escapes.

pub mod record;
