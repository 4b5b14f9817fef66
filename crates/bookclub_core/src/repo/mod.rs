//! Persistence adapters for the club blob.
//!
//! # Responsibility
//! - Define the opaque get/set contract the store persists through.
//! - Keep storage transport details out of the store.
//!
//! # Invariants
//! - A load returns either a complete blob or none.
//! - A save replaces the previous blob for the key in one step.

pub mod blob_repo;
