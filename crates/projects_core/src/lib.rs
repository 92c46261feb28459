//! Data-access core for DIY projects and their materials, steps and
//! categories.
//!
//! Callers go through [`ProjectService`]; the repository underneath owns SQL,
//! transactions and row mapping, and takes connections from a
//! [`ConnectionProvider`].

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{ConnectionProvider, DbError, DbResult, SqliteConnectionProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{
    Category, CategoryId, Material, MaterialId, Project, ProjectId, ProjectValidationError, Step,
    StepId,
};
pub use repo::extract::{extract, MappingError};
pub use repo::project_repo::{
    CategoryLink, PersistenceError, ProjectRepository, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::project_service::{ProjectService, ProjectServiceError, ServiceResult};

pub use rust_decimal::Decimal;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
