//! Domain model for the item catalogue.
//!
//! # Invariants
//! - Every persisted item is identified by a storage-generated `ItemId`.
//! - There is no deletion; rows only grow or change in place.

pub mod item;
