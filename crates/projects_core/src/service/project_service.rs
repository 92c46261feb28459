//! Project use-case service.
//!
//! # Responsibility
//! - Provide the caller-facing project API on top of a repository.
//! - Translate `None` / `false` / missing-link results into explicit
//!   not-found failures that name the missing entity.
//!
//! # Invariants
//! - No transaction handling here; each call is one repository operation.
//! - Repository errors pass through unchanged inside
//!   `ProjectServiceError::Repo`.

use crate::model::project::{Category, CategoryId, Material, Project, ProjectId, Step};
use crate::repo::project_repo::{CategoryLink, ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// A lookup by id found nothing.
    NotFound(ProjectId),
    /// An update, delete or link touched zero rows because the project is gone.
    ConflictOrNotFound {
        operation: &'static str,
        project_id: ProjectId,
    },
    /// A link could not be made because the category is gone.
    CategoryNotFound {
        operation: &'static str,
        category_id: CategoryId,
    },
    /// Validation or persistence failure from the repository.
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(project_id) => {
                write!(f, "project with project ID={project_id} does not exist")
            }
            Self::ConflictOrNotFound {
                operation,
                project_id,
            } => write!(
                f,
                "{operation} affected no rows; project with project ID={project_id} does not exist"
            ),
            Self::CategoryNotFound {
                operation,
                category_id,
            } => write!(
                f,
                "{operation} affected no rows; category with category ID={category_id} does not exist"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type ServiceResult<T> = Result<T, ProjectServiceError>;

/// Project service facade over repository implementations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new project and returns it with its identity.
    pub fn add_project(&self, project: &Project) -> ServiceResult<Project> {
        Ok(self.repo.insert_project(project)?)
    }

    /// Lists project summaries ordered by id.
    pub fn fetch_all_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Loads one project with its materials, steps and categories.
    ///
    /// # Errors
    /// - `NotFound` when no project has `project_id`.
    pub fn fetch_project_by_id(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ProjectServiceError::NotFound(project_id))
    }

    /// Rewrites name, hours, difficulty and notes of a stored project.
    ///
    /// # Errors
    /// - `ConflictOrNotFound` when the project id matches no row.
    pub fn modify_project_details(&self, project: &Project) -> ServiceResult<()> {
        let project_id = project.require_id().map_err(RepoError::from)?;
        if !self.repo.update_project(project)? {
            return Err(ProjectServiceError::ConflictOrNotFound {
                operation: "modify_project_details",
                project_id,
            });
        }
        Ok(())
    }

    /// Deletes a project together with its children.
    ///
    /// # Errors
    /// - `ConflictOrNotFound` when the project id matches no row.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.repo.delete_project(project_id)? {
            return Err(ProjectServiceError::ConflictOrNotFound {
                operation: "delete_project",
                project_id,
            });
        }
        Ok(())
    }

    pub fn add_material(&self, material: &Material) -> ServiceResult<Material> {
        Ok(self.repo.insert_material(material)?)
    }

    pub fn add_step(&self, step: &Step) -> ServiceResult<Step> {
        Ok(self.repo.insert_step(step)?)
    }

    pub fn add_category(&self, category: &Category) -> ServiceResult<Category> {
        Ok(self.repo.insert_category(category)?)
    }

    pub fn fetch_all_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.fetch_all_categories()?)
    }

    /// Attaches an existing category to an existing project.
    ///
    /// # Errors
    /// - `ConflictOrNotFound` when the project is missing.
    /// - `CategoryNotFound` when the project exists but the category does not.
    pub fn assign_category(
        &self,
        project_id: ProjectId,
        category_id: CategoryId,
    ) -> ServiceResult<()> {
        match self.repo.add_category_to_project(project_id, category_id)? {
            CategoryLink::Linked => Ok(()),
            CategoryLink::ProjectMissing => Err(ProjectServiceError::ConflictOrNotFound {
                operation: "assign_category",
                project_id,
            }),
            CategoryLink::CategoryMissing => Err(ProjectServiceError::CategoryNotFound {
                operation: "assign_category",
                category_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectService, ProjectServiceError};
    use crate::model::project::{Category, CategoryId, Material, Project, ProjectId, Step};
    use crate::repo::project_repo::{CategoryLink, ProjectRepository, RepoError, RepoResult};
    use rust_decimal::Decimal;

    /// Repository whose every lookup misses.
    struct EmptyRepository;

    impl ProjectRepository for EmptyRepository {
        fn insert_project(&self, project: &Project) -> RepoResult<Project> {
            Ok(Project {
                project_id: Some(1),
                ..project.clone()
            })
        }

        fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
            Ok(Vec::new())
        }

        fn fetch_project_by_id(&self, _project_id: ProjectId) -> RepoResult<Option<Project>> {
            Ok(None)
        }

        fn update_project(&self, _project: &Project) -> RepoResult<bool> {
            Ok(false)
        }

        fn delete_project(&self, _project_id: ProjectId) -> RepoResult<bool> {
            Ok(false)
        }

        fn insert_material(&self, material: &Material) -> RepoResult<Material> {
            Ok(material.clone())
        }

        fn insert_step(&self, step: &Step) -> RepoResult<Step> {
            Ok(step.clone())
        }

        fn insert_category(&self, category: &Category) -> RepoResult<Category> {
            Ok(category.clone())
        }

        fn fetch_all_categories(&self) -> RepoResult<Vec<Category>> {
            Ok(Vec::new())
        }

        fn add_category_to_project(
            &self,
            _project_id: ProjectId,
            _category_id: CategoryId,
        ) -> RepoResult<CategoryLink> {
            Ok(CategoryLink::ProjectMissing)
        }
    }

    fn stored_project(project_id: ProjectId) -> Project {
        let mut project = Project::new("Hang a door", Decimal::new(4, 0), Decimal::ZERO, 2);
        project.project_id = Some(project_id);
        project
    }

    #[test]
    fn absent_project_becomes_not_found() {
        let service = ProjectService::new(EmptyRepository);
        let err = service.fetch_project_by_id(42).unwrap_err();
        assert!(matches!(err, ProjectServiceError::NotFound(42)));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn zero_affected_rows_become_conflict_or_not_found() {
        let service = ProjectService::new(EmptyRepository);

        let err = service.modify_project_details(&stored_project(7)).unwrap_err();
        assert!(matches!(
            err,
            ProjectServiceError::ConflictOrNotFound {
                operation: "modify_project_details",
                project_id: 7
            }
        ));

        let err = service.delete_project(7).unwrap_err();
        assert!(matches!(
            err,
            ProjectServiceError::ConflictOrNotFound {
                operation: "delete_project",
                ..
            }
        ));

        let err = service.assign_category(7, 3).unwrap_err();
        assert!(matches!(
            err,
            ProjectServiceError::ConflictOrNotFound { project_id: 7, .. }
        ));
    }

    #[test]
    fn transient_project_cannot_be_modified() {
        let service = ProjectService::new(EmptyRepository);
        let mut project = stored_project(1);
        project.project_id = None;

        let err = service.modify_project_details(&project).unwrap_err();
        assert!(matches!(err, ProjectServiceError::Repo(RepoError::Validation(_))));
    }
}
