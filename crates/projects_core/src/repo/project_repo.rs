//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `project` and its `material`, `step` and
//!   `project_category` children.
//! - Draw one transaction per logical operation and one connection per call.
//! - Compose the aggregate view returned by fetch-by-id.
//!
//! # Invariants
//! - Write paths validate their input before any SQL runs.
//! - Every statement is parameterized; only static identifiers are inlined.
//! - Driver and mapping failures leave this module as
//!   `RepoError::Persistence`, after the enclosing transaction rolled back.
//! - "Not there" is reported as `None`, `false` or a `CategoryLink`
//!   variant, never as an error.

use crate::db::{ConnectionProvider, DbError};
use crate::model::project::{
    Category, CategoryId, Material, Project, ProjectId, ProjectValidationError, Step,
};
use crate::repo::extract::MappingError;
use crate::repo::tx::{
    decimal_param, exists, in_transaction, last_insert_id, query_all, query_optional,
};
use log::info;
use rusqlite::{params, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure talking to or reading from the storage engine.
#[derive(Debug)]
pub enum PersistenceError {
    /// Connection, statement or constraint failure.
    Db(DbError),
    /// A row did not fit the entity it was read into.
    Mapping(MappingError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Mapping(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Mapping(err) => Some(err),
        }
    }
}

/// Repository error for project persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    Persistence(PersistenceError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Persistence(PersistenceError::Db(value))
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(PersistenceError::Db(DbError::Sqlite(value)))
    }
}

impl From<MappingError> for RepoError {
    fn from(value: MappingError) -> Self {
        Self::Persistence(PersistenceError::Mapping(value))
    }
}

/// Repository interface for projects and their children.
pub trait ProjectRepository {
    /// Persists a new project and returns it with its generated identity.
    fn insert_project(&self, project: &Project) -> RepoResult<Project>;
    /// Lists every project by ascending id, without child collections.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Loads one project with materials, steps and categories.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Rewrites the scalar fields of a stored project.
    fn update_project(&self, project: &Project) -> RepoResult<bool>;
    /// Deletes a project; its materials, steps and category links cascade.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
    fn insert_material(&self, material: &Material) -> RepoResult<Material>;
    fn insert_step(&self, step: &Step) -> RepoResult<Step>;
    fn insert_category(&self, category: &Category) -> RepoResult<Category>;
    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>>;
    /// Links a category to a project, reporting which side is missing.
    fn add_category_to_project(
        &self,
        project_id: ProjectId,
        category_id: CategoryId,
    ) -> RepoResult<CategoryLink>;
}

/// Outcome of linking a category to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLink {
    /// The link exists now, whether or not it existed before.
    Linked,
    ProjectMissing,
    CategoryMissing,
}

/// SQLite-backed project repository.
///
/// Holds no connection; every call opens its own through `provider` and
/// drops it before returning.
pub struct SqliteProjectRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteProjectRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ConnectionProvider> ProjectRepository for SqliteProjectRepository<P> {
    fn insert_project(&self, project: &Project) -> RepoResult<Project> {
        project.validate()?;

        let mut conn = self.provider.connect()?;
        let project_id = in_transaction(
            &mut conn,
            "project_insert",
            TransactionBehavior::Immediate,
            |tx| {
                tx.execute(
                    "INSERT INTO project (
                        project_name,
                        estimated_hours,
                        actual_hours,
                        difficulty,
                        notes
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        project.project_name.as_str(),
                        decimal_param(project.estimated_hours),
                        decimal_param(project.actual_hours),
                        project.difficulty,
                        project.notes.as_deref(),
                    ],
                )?;
                Ok(last_insert_id(tx))
            },
        )?;

        info!("event=project_insert module=repo status=ok project_id={project_id}");
        Ok(Project {
            project_id: Some(project_id),
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
            ..project.clone()
        })
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        let mut conn = self.provider.connect()?;
        in_transaction(
            &mut conn,
            "project_fetch_all",
            TransactionBehavior::Deferred,
            |tx| query_all(tx, &format!("{PROJECT_SELECT_SQL} ORDER BY project_id ASC;"), []),
        )
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        let mut conn = self.provider.connect()?;
        in_transaction(
            &mut conn,
            "project_fetch_by_id",
            TransactionBehavior::Deferred,
            |tx| {
                let found: Option<Project> = query_optional(
                    tx,
                    &format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"),
                    [project_id],
                )?;
                let Some(mut project) = found else {
                    return Ok(None);
                };

                project.materials = query_all(
                    tx,
                    "SELECT
                        material_id,
                        project_id,
                        material_name,
                        num_required,
                        cost
                     FROM material
                     WHERE project_id = ?1
                     ORDER BY material_id ASC;",
                    [project_id],
                )?;
                project.steps = query_all(
                    tx,
                    "SELECT
                        step_id,
                        project_id,
                        step_text,
                        step_order
                     FROM step
                     WHERE project_id = ?1
                     ORDER BY step_order ASC, step_id ASC;",
                    [project_id],
                )?;
                project.categories = query_all(
                    tx,
                    "SELECT
                        c.category_id,
                        c.category_name
                     FROM category c
                     INNER JOIN project_category pc ON pc.category_id = c.category_id
                     WHERE pc.project_id = ?1
                     ORDER BY c.category_id ASC;",
                    [project_id],
                )?;

                Ok(Some(project))
            },
        )
    }

    fn update_project(&self, project: &Project) -> RepoResult<bool> {
        let project_id = project.require_id()?;
        project.validate()?;

        let mut conn = self.provider.connect()?;
        let changed = in_transaction(
            &mut conn,
            "project_update",
            TransactionBehavior::Immediate,
            |tx| {
                Ok(tx.execute(
                    "UPDATE project
                     SET
                        project_name = ?1,
                        estimated_hours = ?2,
                        actual_hours = ?3,
                        difficulty = ?4,
                        notes = ?5
                     WHERE project_id = ?6;",
                    params![
                        project.project_name.as_str(),
                        decimal_param(project.estimated_hours),
                        decimal_param(project.actual_hours),
                        project.difficulty,
                        project.notes.as_deref(),
                        project_id,
                    ],
                )?)
            },
        )?;

        Ok(changed == 1)
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        let mut conn = self.provider.connect()?;
        let changed = in_transaction(
            &mut conn,
            "project_delete",
            TransactionBehavior::Immediate,
            |tx| {
                Ok(tx.execute(
                    "DELETE FROM project WHERE project_id = ?1;",
                    [project_id],
                )?)
            },
        )?;

        if changed == 1 {
            info!("event=project_delete module=repo status=ok project_id={project_id}");
        }
        Ok(changed == 1)
    }

    fn insert_material(&self, material: &Material) -> RepoResult<Material> {
        material.validate()?;

        let mut conn = self.provider.connect()?;
        let material_id = in_transaction(
            &mut conn,
            "material_insert",
            TransactionBehavior::Immediate,
            |tx| {
                tx.execute(
                    "INSERT INTO material (
                        project_id,
                        material_name,
                        num_required,
                        cost
                    ) VALUES (?1, ?2, ?3, ?4);",
                    params![
                        material.project_id,
                        material.material_name.as_str(),
                        material.num_required,
                        material.cost.map(decimal_param),
                    ],
                )?;
                Ok(last_insert_id(tx))
            },
        )?;

        Ok(Material {
            material_id: Some(material_id),
            ..material.clone()
        })
    }

    fn insert_step(&self, step: &Step) -> RepoResult<Step> {
        step.validate()?;

        let mut conn = self.provider.connect()?;
        let step_id = in_transaction(
            &mut conn,
            "step_insert",
            TransactionBehavior::Immediate,
            |tx| {
                tx.execute(
                    "INSERT INTO step (
                        project_id,
                        step_text,
                        step_order
                    ) VALUES (?1, ?2, ?3);",
                    params![step.project_id, step.step_text.as_str(), step.step_order],
                )?;
                Ok(last_insert_id(tx))
            },
        )?;

        Ok(Step {
            step_id: Some(step_id),
            ..step.clone()
        })
    }

    fn insert_category(&self, category: &Category) -> RepoResult<Category> {
        category.validate()?;

        let mut conn = self.provider.connect()?;
        let category_id = in_transaction(
            &mut conn,
            "category_insert",
            TransactionBehavior::Immediate,
            |tx| {
                tx.execute(
                    "INSERT INTO category (category_name) VALUES (?1);",
                    [category.category_name.as_str()],
                )?;
                Ok(last_insert_id(tx))
            },
        )?;

        Ok(Category {
            category_id: Some(category_id),
            ..category.clone()
        })
    }

    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>> {
        let mut conn = self.provider.connect()?;
        in_transaction(
            &mut conn,
            "category_fetch_all",
            TransactionBehavior::Deferred,
            |tx| {
                query_all(
                    tx,
                    "SELECT category_id, category_name FROM category ORDER BY category_id ASC;",
                    [],
                )
            },
        )
    }

    fn add_category_to_project(
        &self,
        project_id: ProjectId,
        category_id: CategoryId,
    ) -> RepoResult<CategoryLink> {
        let mut conn = self.provider.connect()?;
        in_transaction(
            &mut conn,
            "project_category_link",
            TransactionBehavior::Immediate,
            |tx| {
                if !exists(
                    tx,
                    "SELECT EXISTS(SELECT 1 FROM project WHERE project_id = ?1);",
                    [project_id],
                )? {
                    return Ok(CategoryLink::ProjectMissing);
                }
                if !exists(
                    tx,
                    "SELECT EXISTS(SELECT 1 FROM category WHERE category_id = ?1);",
                    [category_id],
                )? {
                    return Ok(CategoryLink::CategoryMissing);
                }

                tx.execute(
                    "INSERT OR IGNORE INTO project_category (project_id, category_id)
                     VALUES (?1, ?2);",
                    [project_id, category_id],
                )?;
                Ok(CategoryLink::Linked)
            },
        )
    }
}
