//! Domain model for popularity rankings.
//!
//! # Responsibility
//! - Define the entry record and the ordered mapping the store works on.
//!
//! # Invariants
//! - Names are unique keys; iteration order is insertion order.

pub mod entry;
