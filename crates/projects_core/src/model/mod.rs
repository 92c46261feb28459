//! Domain model for projects and their materials, steps and categories.
//!
//! # Responsibility
//! - Define plain data holders shared by repository and service layers.
//! - Own field-level validation rules enforced before persistence.
//!
//! # Invariants
//! - Identities are assigned by the store; a transient value carries `None`.
//! - Hours and costs are fixed-point decimals, never floats.

pub mod project;
