//! Domain entities for the Projects domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meshforge_common::{Error, Result};

/// Maximum project name length
const MAX_NAME_LEN: usize = 120;

/// Project entity: top-level container grouping assets and jobs.
///
/// The id is immutable once created; there is no rename-by-id path in the
/// public API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with validation
    pub fn new(name: String, description: Option<String>) -> Result<Self> {
        validate_name(&name)?;

        let now = Utc::now();
        Ok(Project {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "Project name must be ≤{MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}
