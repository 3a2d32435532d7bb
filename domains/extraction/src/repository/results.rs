//! Extraction result repository

use crate::domain::entities::ExtractionResult;
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

const RESULT_COLUMNS: &str =
    "id, project_id, version, dimensions, features, tasks, created_at, updated_at";

#[derive(Clone)]
pub struct ExtractionResultRepository {
    pool: PgPool,
}

impl ExtractionResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the latest extraction result for a project
    pub async fn latest_for_project(&self, project_id: Uuid) -> Result<Option<ExtractionResult>> {
        let query = format!(
            "SELECT {RESULT_COLUMNS} FROM extraction_results \
             WHERE project_id = $1 ORDER BY version DESC LIMIT 1"
        );
        let result = sqlx::query_as::<_, ExtractionResult>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }

    /// Next version number for a project (1 if none exist yet)
    pub async fn next_version(&self, project_id: Uuid) -> Result<i32> {
        let version = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM extraction_results WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(version)
    }

    /// Create a new extraction result
    pub async fn create(&self, result: &ExtractionResult) -> Result<ExtractionResult> {
        let query = format!(
            "INSERT INTO extraction_results ({RESULT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {RESULT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ExtractionResult>(&query)
            .bind(result.id)
            .bind(result.project_id)
            .bind(result.version)
            .bind(&result.dimensions)
            .bind(&result.features)
            .bind(&result.tasks)
            .bind(result.created_at)
            .bind(result.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }
}
