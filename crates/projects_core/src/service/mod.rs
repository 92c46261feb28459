//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing APIs.
//! - Turn storage-level absence into explicit failures.

pub mod project_service;
