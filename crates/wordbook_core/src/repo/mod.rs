//! Storage backends behind one repository contract.
//!
//! # Responsibility
//! - Define the operation set every backend implements.
//! - Keep substrate details (SQL, key layout) inside each backend.
//!
//! # Invariants
//! - Both backends validate input before writing.
//! - Deleting a book leaves no reachable word of that book behind.

pub mod flat_repo;
#[cfg(feature = "relational")]
pub mod sqlite_repo;
pub mod wordbook_repo;
