//! Asset management API handlers

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use meshforge_common::{Error, Pagination, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::AssetsState;
use crate::domain::entities::{Asset, AssetType};

/// Asset response DTO
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub asset_type: AssetType,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetResponse {
    fn from(a: Asset) -> Self {
        let preview_url = a.previewable().then(|| format!("/v1/assets/{}/preview", a.id));
        Self {
            id: a.id,
            project_id: a.project_id,
            asset_type: a.asset_type,
            filename: a.filename,
            content_type: a.content_type,
            size_bytes: a.size_bytes,
            preview_url,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Query parameters for listing assets
#[derive(Debug, Deserialize)]
pub struct ListAssetsParams {
    pub project_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Upload assets (images, drawings, 3D models).
///
/// Multipart form: `project_id`, `asset_type`, and one or more `files`
/// parts. All files in a request share the same project and asset type.
pub async fn upload_assets(
    State(state): State<AssetsState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<AssetResponse>>)> {
    let mut project_id: Option<Uuid> = None;
    let mut asset_type: Option<AssetType> = None;
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("project_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(format!("Invalid project_id field: {e}")))?;
                let id = text
                    .parse()
                    .map_err(|_| Error::Validation("project_id must be a UUID".to_string()))?;
                project_id = Some(id);
            }
            Some("asset_type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Validation(format!("Invalid asset_type field: {e}")))?;
                asset_type = Some(text.parse()?);
            }
            Some("files") => {
                let filename = field
                    .file_name()
                    .map(ToString::to_string)
                    .ok_or_else(|| Error::Validation("File part missing filename".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read file part: {e}")))?;
                files.push((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let project_id =
        project_id.ok_or_else(|| Error::Validation("project_id is required".to_string()))?;
    let asset_type =
        asset_type.ok_or_else(|| Error::Validation("asset_type is required".to_string()))?;
    if files.is_empty() {
        return Err(Error::Validation("At least one file is required".to_string()));
    }

    if !state.projects.exists(project_id).await? {
        return Err(Error::NotFound("Project not found".to_string()));
    }

    let mut responses = Vec::with_capacity(files.len());
    for (filename, content_type, bytes) in files {
        let (storage_path, size_bytes) = state.storage.save_upload(&filename, &bytes).await?;
        let asset = Asset::new(
            project_id,
            asset_type,
            filename,
            content_type,
            size_bytes,
            storage_path,
        )?;
        let created = state.assets.create(&asset).await?;

        tracing::info!(
            asset_id = %created.id,
            project_id = %project_id,
            asset_type = asset_type.as_str(),
            size_bytes,
            "Asset uploaded"
        );
        responses.push(created.into());
    }

    Ok((StatusCode::CREATED, Json(responses)))
}

/// List assets, optionally filtered by project
pub async fn list_assets(
    State(state): State<AssetsState>,
    Query(params): Query<ListAssetsParams>,
) -> Result<Json<Vec<AssetResponse>>> {
    let page = Pagination {
        limit: params.limit,
        offset: params.offset,
    };
    let assets = state
        .assets
        .list(params.project_id, page.limit(), page.offset())
        .await?;
    let responses: Vec<AssetResponse> = assets.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single asset by ID
pub async fn get_asset(
    State(state): State<AssetsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetResponse>> {
    let asset = state
        .assets
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Asset not found".to_string()))?;

    Ok(Json(asset.into()))
}

/// Download an asset as an attachment
pub async fn download_asset(
    State(state): State<AssetsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    serve_asset_file(&state, id, Disposition::Attachment).await
}

/// Serve an asset inline (for image/render previews)
pub async fn preview_asset(
    State(state): State<AssetsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    serve_asset_file(&state, id, Disposition::Inline).await
}

enum Disposition {
    Attachment,
    Inline,
}

async fn serve_asset_file(
    state: &AssetsState,
    id: Uuid,
    disposition: Disposition,
) -> Result<Response> {
    let asset = state
        .assets
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Asset not found".to_string()))?;

    let bytes = tokio::fs::read(&asset.storage_path).await.map_err(|e| {
        tracing::error!(asset_id = %id, path = %asset.storage_path, error = %e, "Asset file missing from storage");
        Error::Internal("Asset file missing from storage".to_string())
    })?;

    let disposition_value = match disposition {
        Disposition::Attachment => format!("attachment; filename=\"{}\"", asset.filename),
        Disposition::Inline => format!("inline; filename=\"{}\"", asset.filename),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&asset.content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition_value)
            .map_err(|_| Error::Internal("Invalid asset filename".to_string()))?,
    );

    let mut response = Response::new(Body::from(bytes));
    response.headers_mut().extend(headers);
    Ok(response)
}
