//! Asset repository

use crate::domain::entities::Asset;
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// All columns in the assets table, used for SELECT and RETURNING clauses.
const ASSET_COLUMNS: &str = "\
    id, project_id, asset_type, filename, content_type, \
    size_bytes, storage_path, created_at, updated_at";

#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find asset by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Asset>> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(asset)
    }

    /// List assets, optionally scoped to a project, newest first
    pub async fn list(
        &self,
        project_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>> {
        let assets = match project_id {
            Some(project_id) => {
                let query = format!(
                    "SELECT {ASSET_COLUMNS} FROM assets WHERE project_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Asset>(&query)
                    .bind(project_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {ASSET_COLUMNS} FROM assets \
                     ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Asset>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(assets)
    }

    /// Create a new asset record
    pub async fn create(&self, asset: &Asset) -> Result<Asset> {
        let query = format!(
            "INSERT INTO assets ({ASSET_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {ASSET_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Asset>(&query)
            .bind(asset.id)
            .bind(asset.project_id)
            .bind(asset.asset_type)
            .bind(&asset.filename)
            .bind(&asset.content_type)
            .bind(asset.size_bytes)
            .bind(&asset.storage_path)
            .bind(asset.created_at)
            .bind(asset.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }
}
