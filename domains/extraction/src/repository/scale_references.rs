//! Scale reference repository

use crate::domain::entities::ScaleReference;
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

const SCALE_REFERENCE_COLUMNS: &str =
    "id, project_id, reference_name, reference_value, unit, created_at";

#[derive(Clone)]
pub struct ScaleReferenceRepository {
    pool: PgPool,
}

impl ScaleReferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the scale reference for a project
    pub async fn find_by_project(&self, project_id: Uuid) -> Result<Option<ScaleReference>> {
        let query =
            format!("SELECT {SCALE_REFERENCE_COLUMNS} FROM scale_references WHERE project_id = $1");
        let reference = sqlx::query_as::<_, ScaleReference>(&query)
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reference)
    }

    /// Replace the project's scale reference (delete any existing, then
    /// insert) inside a single transaction.
    pub async fn replace(&self, reference: &ScaleReference) -> Result<ScaleReference> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scale_references WHERE project_id = $1")
            .bind(reference.project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO scale_references ({SCALE_REFERENCE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {SCALE_REFERENCE_COLUMNS}"
        );
        let created = sqlx::query_as::<_, ScaleReference>(&query)
            .bind(reference.id)
            .bind(reference.project_id)
            .bind(&reference.reference_name)
            .bind(reference.reference_value)
            .bind(&reference.unit)
            .bind(reference.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }
}
