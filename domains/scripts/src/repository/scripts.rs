//! Script version repository

use crate::domain::entities::ScriptVersion;
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

const SCRIPT_COLUMNS: &str = "id, project_id, version, script_text, created_at";

#[derive(Clone)]
pub struct ScriptVersionRepository {
    pool: PgPool,
}

impl ScriptVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a script version by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<ScriptVersion>> {
        let query = format!("SELECT {SCRIPT_COLUMNS} FROM script_versions WHERE id = $1");
        let script = sqlx::query_as::<_, ScriptVersion>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(script)
    }

    /// List all script versions for a project, newest first
    pub async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<ScriptVersion>> {
        let query = format!(
            "SELECT {SCRIPT_COLUMNS} FROM script_versions \
             WHERE project_id = $1 ORDER BY version DESC"
        );
        let scripts = sqlx::query_as::<_, ScriptVersion>(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(scripts)
    }

    /// Get the latest script version for a project
    pub async fn latest_for_project(&self, project_id: Uuid) -> Result<Option<ScriptVersion>> {
        let query = format!(
            "SELECT {SCRIPT_COLUMNS} FROM script_versions \
             WHERE project_id = $1 ORDER BY version DESC LIMIT 1"
        );
        let script = sqlx::query_as::<_, ScriptVersion>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(script)
    }

    /// Next version number for a project (1 if none exist yet)
    pub async fn next_version(&self, project_id: Uuid) -> Result<i32> {
        let version = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM script_versions WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(version)
    }

    /// Create a new script version
    pub async fn create(&self, script: &ScriptVersion) -> Result<ScriptVersion> {
        let query = format!(
            "INSERT INTO script_versions ({SCRIPT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SCRIPT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ScriptVersion>(&query)
            .bind(script.id)
            .bind(script.project_id)
            .bind(script.version)
            .bind(&script.script_text)
            .bind(script.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }
}
