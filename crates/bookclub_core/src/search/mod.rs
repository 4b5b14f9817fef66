//! Book search and filter entry points.
//!
//! # Responsibility
//! - Compute filtered book views from store state and active criteria.
//! - Stay pure: no store access, no persistence.

pub mod book_filter;
