//! Project aggregate and its child entities.
//!
//! # Responsibility
//! - Describe the `project`, `material`, `step` and `category` row shapes.
//! - Validate caller input before it reaches SQL.
//!
//! # Invariants
//! - `project_id` is `None` until insert and never changes afterwards.
//! - `materials`, `steps` and `categories` are only filled by fetch-by-id.
//! - Field names match column names; the row extractor relies on it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectId = i64;
pub type MaterialId = i64;
pub type StepId = i64;
pub type CategoryId = i64;

/// Column width of every name field in the store.
pub const MAX_NAME_CHARS: usize = 128;
/// Fractional digits kept for hours and costs.
pub const MAX_DECIMAL_SCALE: u32 = 2;
pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 5;

/// A do-it-yourself project with its planning data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: Option<ProjectId>,
    pub project_name: String,
    pub estimated_hours: Decimal,
    pub actual_hours: Decimal,
    /// 1 (easy) to 5 (hard).
    pub difficulty: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Something consumed by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: Option<MaterialId>,
    pub project_id: ProjectId,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal>,
}

/// One instruction of a project, positioned by `step_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub step_id: Option<StepId>,
    pub project_id: ProjectId,
    pub step_text: String,
    pub step_order: i32,
}

/// Label shared by any number of projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: Option<CategoryId>,
    pub category_name: String,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    BlankName { field: &'static str },
    NameTooLong { field: &'static str, max_chars: usize },
    NegativeAmount { field: &'static str },
    TooManyDecimals { field: &'static str, max_scale: u32 },
    DifficultyOutOfRange { value: i32 },
    NonPositive { field: &'static str, value: i32 },
    MissingProjectId,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { field } => write!(f, "{field} must not be blank"),
            Self::NameTooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::NegativeAmount { field } => write!(f, "{field} must not be negative"),
            Self::TooManyDecimals { field, max_scale } => {
                write!(f, "{field} allows at most {max_scale} decimal places")
            }
            Self::DifficultyOutOfRange { value } => write!(
                f,
                "difficulty {value} is outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"
            ),
            Self::NonPositive { field, value } => write!(f, "{field} must be positive, got {value}"),
            Self::MissingProjectId => write!(f, "project has no project_id"),
        }
    }
}

impl Error for ProjectValidationError {}

impl Project {
    /// Creates a transient project with no identity and empty collections.
    pub fn new(
        project_name: impl Into<String>,
        estimated_hours: Decimal,
        actual_hours: Decimal,
        difficulty: i32,
    ) -> Self {
        Self {
            project_id: None,
            project_name: project_name.into(),
            estimated_hours,
            actual_hours,
            difficulty,
            notes: None,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Checks the scalar project fields. Child collections are not inspected;
    /// children are persisted through their own operations.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_name("project_name", &self.project_name)?;
        validate_amount("estimated_hours", self.estimated_hours)?;
        validate_amount("actual_hours", self.actual_hours)?;
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ProjectValidationError::DifficultyOutOfRange {
                value: self.difficulty,
            });
        }
        Ok(())
    }

    /// Returns the store identity, failing for transient projects.
    pub fn require_id(&self) -> Result<ProjectId, ProjectValidationError> {
        self.project_id
            .ok_or(ProjectValidationError::MissingProjectId)
    }
}

impl Material {
    pub fn new(project_id: ProjectId, material_name: impl Into<String>) -> Self {
        Self {
            material_id: None,
            project_id,
            material_name: material_name.into(),
            num_required: None,
            cost: None,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_name("material_name", &self.material_name)?;
        if let Some(count) = self.num_required {
            validate_positive("num_required", count)?;
        }
        if let Some(cost) = self.cost {
            validate_amount("cost", cost)?;
        }
        Ok(())
    }
}

impl Step {
    pub fn new(project_id: ProjectId, step_text: impl Into<String>, step_order: i32) -> Self {
        Self {
            step_id: None,
            project_id,
            step_text: step_text.into(),
            step_order,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.step_text.trim().is_empty() {
            return Err(ProjectValidationError::BlankName { field: "step_text" });
        }
        validate_positive("step_order", self.step_order)
    }
}

impl Category {
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_id: None,
            category_name: category_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        validate_name("category_name", &self.category_name)
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ProjectValidationError> {
    if value.trim().is_empty() {
        return Err(ProjectValidationError::BlankName { field });
    }
    if value.chars().count() > MAX_NAME_CHARS {
        return Err(ProjectValidationError::NameTooLong {
            field,
            max_chars: MAX_NAME_CHARS,
        });
    }
    Ok(())
}

fn validate_amount(field: &'static str, value: Decimal) -> Result<(), ProjectValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ProjectValidationError::NegativeAmount { field });
    }
    if value.normalize().scale() > MAX_DECIMAL_SCALE {
        return Err(ProjectValidationError::TooManyDecimals {
            field,
            max_scale: MAX_DECIMAL_SCALE,
        });
    }
    Ok(())
}

fn validate_positive(field: &'static str, value: i32) -> Result<(), ProjectValidationError> {
    if value <= 0 {
        return Err(ProjectValidationError::NonPositive { field, value });
    }
    Ok(())
}
