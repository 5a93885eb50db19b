//! Ranking use-case services.
//!
//! # Responsibility
//! - Orchestrate backend calls into query and increment APIs.
//! - Keep callers decoupled from the CSV layout.

pub mod ranking_store;
