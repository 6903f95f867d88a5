//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the item data access contract shared by every backend.
//! - Keep SQL details and filter assembly out of the service layer.
//!
//! # Invariants
//! - Every backend applies the same `ItemFilter` semantics in `find_all`.
//! - `update` on a missing id fails with `RepoError::NotFound` everywhere.

pub mod filter;
pub mod item_repo;
pub mod memory_repo;
pub mod session_repo;
pub mod sqlite_repo;
