//! Domain entities for the Assets domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meshforge_common::{Error, Result};

/// Kind of uploaded or generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Image,
    Drawing2d,
    Model3d,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Drawing2d => "drawing2d",
            Self::Model3d => "model3d",
        }
    }
}

impl std::str::FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(Self::Image),
            "drawing2d" => Ok(Self::Drawing2d),
            "model3d" => Ok(Self::Model3d),
            other => Err(Error::Validation(format!(
                "Unknown asset_type: '{other}' (expected image, drawing2d, or model3d)"
            ))),
        }
    }
}

/// Asset entity: a file associated with a project.
///
/// `storage_path` is server-internal and never serialized into API
/// responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub project_id: Uuid,
    pub asset_type: AssetType,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Create a new asset record with validation
    pub fn new(
        project_id: Uuid,
        asset_type: AssetType,
        filename: String,
        content_type: String,
        size_bytes: i64,
        storage_path: String,
    ) -> Result<Self> {
        if filename.is_empty() {
            return Err(Error::Validation("Asset filename is required".to_string()));
        }
        if size_bytes < 0 {
            return Err(Error::Validation(
                "Asset size cannot be negative".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Asset {
            id: Uuid::new_v4(),
            project_id,
            asset_type,
            filename,
            content_type,
            size_bytes,
            storage_path,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether this asset can be previewed inline in a browser
    pub fn previewable(&self) -> bool {
        matches!(self.asset_type, AssetType::Image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(asset_type: AssetType) -> Asset {
        Asset::new(
            Uuid::new_v4(),
            asset_type,
            "bracket.png".to_string(),
            "image/png".to_string(),
            2048,
            "/uploads/abc_bracket.png".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_asset_type_parsing() {
        assert_eq!("image".parse::<AssetType>().unwrap(), AssetType::Image);
        assert_eq!(
            "drawing2d".parse::<AssetType>().unwrap(),
            AssetType::Drawing2d
        );
        assert_eq!("model3d".parse::<AssetType>().unwrap(), AssetType::Model3d);
        assert!("video".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_asset_type_round_trip() {
        for t in [AssetType::Image, AssetType::Drawing2d, AssetType::Model3d] {
            assert_eq!(t.as_str().parse::<AssetType>().unwrap(), t);
        }
    }

    #[test]
    fn test_asset_validation() {
        let result = Asset::new(
            Uuid::new_v4(),
            AssetType::Image,
            "".to_string(),
            "image/png".to_string(),
            10,
            "/tmp/x".to_string(),
        );
        assert!(result.is_err());

        let result = Asset::new(
            Uuid::new_v4(),
            AssetType::Image,
            "a.png".to_string(),
            "image/png".to_string(),
            -1,
            "/tmp/x".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_only_images_previewable() {
        assert!(asset(AssetType::Image).previewable());
        assert!(!asset(AssetType::Drawing2d).previewable());
        assert!(!asset(AssetType::Model3d).previewable());
    }
}
