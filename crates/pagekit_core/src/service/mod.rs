//! Use-case services on top of the record store.
//!
//! # Responsibility
//! - Orchestrate store reads and page rendering for entry points.
//!
//! # Invariants
//! - Services never bypass `RecordStore` for persistence.

pub mod page_service;
