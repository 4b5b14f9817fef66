//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entity mutations and persistence into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod clock;
pub mod club_store;
pub mod ids;
