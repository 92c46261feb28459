//! Repository layer: SQL, transactions and row mapping.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Transactions are opened per logical operation, never per statement.
//! - Repository APIs return absence (`None`, `false`) for missing rows and
//!   reserve errors for validation and storage failures.

pub mod extract;
pub mod project_repo;
mod tx;
