//! Domain entities for the Scripts domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meshforge_common::{Error, Result};

/// A versioned generated Blender Python script.
///
/// Versions increase strictly per project; script text is immutable once
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScriptVersion {
    pub id: Uuid,
    pub project_id: Uuid,
    pub version: i32,
    pub script_text: String,
    pub created_at: DateTime<Utc>,
}

impl ScriptVersion {
    /// Create a new script version with validation
    pub fn new(project_id: Uuid, version: i32, script_text: String) -> Result<Self> {
        if version < 1 {
            return Err(Error::Validation(
                "Script version must be ≥1".to_string(),
            ));
        }
        if script_text.is_empty() {
            return Err(Error::Validation(
                "Script text must not be empty".to_string(),
            ));
        }

        Ok(ScriptVersion {
            id: Uuid::new_v4(),
            project_id,
            version,
            script_text,
            created_at: Utc::now(),
        })
    }

    /// Download filename for this script version
    pub fn download_filename(&self) -> String {
        format!("blender_script_v{}.py", self.version)
    }
}
