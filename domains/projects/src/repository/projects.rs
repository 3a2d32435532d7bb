//! Project repository

use crate::domain::entities::Project;
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the projects table, used for SELECT and RETURNING clauses.
const PROJECT_COLUMNS: &str = "id, name, description, created_at, updated_at";

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find project by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Project>> {
        let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    /// Check that a project exists (used by other domains before inserting
    /// rows that reference it).
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found > 0)
    }

    /// List all projects, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    /// Create a new project
    pub async fn create(&self, project: &Project) -> Result<Project> {
        let query = format!(
            "INSERT INTO projects ({PROJECT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROJECT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Project>(&query)
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }
}
