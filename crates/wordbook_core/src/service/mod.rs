//! Use-case services above the storage backends.
//!
//! # Responsibility
//! - Choose the backend once per process.
//! - Seed default data and expose the storage facade.

pub mod backend_selector;
pub mod seed;
pub mod storage_service;
