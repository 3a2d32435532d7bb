//! Domain entities for the Extraction domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use meshforge_common::{Error, Result};

/// Scale reference: the user-supplied calibration dimension for a project.
///
/// At most one per project; setting a new one replaces the old.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScaleReference {
    pub id: Uuid,
    pub project_id: Uuid,
    pub reference_name: String,
    pub reference_value: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

impl ScaleReference {
    /// Create a new scale reference with validation
    pub fn new(
        project_id: Uuid,
        reference_name: String,
        reference_value: f64,
        unit: String,
    ) -> Result<Self> {
        if reference_name.trim().is_empty() {
            return Err(Error::Validation(
                "Reference name must not be empty".to_string(),
            ));
        }
        if !reference_value.is_finite() || reference_value <= 0.0 {
            return Err(Error::Validation(
                "Reference value must be greater than zero".to_string(),
            ));
        }

        Ok(ScaleReference {
            id: Uuid::new_v4(),
            project_id,
            reference_name,
            reference_value,
            unit,
            created_at: Utc::now(),
        })
    }
}

/// A single extracted dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionItem {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub confidence: f64,
    /// ratio_estimation | mesh_bbox | user_reference
    pub source: String,
}

/// Extraction result: a versioned set of dimensions, detected features, and
/// modeling tasks for a project. Versions increase strictly per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExtractionResult {
    pub id: Uuid,
    pub project_id: Uuid,
    pub version: i32,
    pub dimensions: Json<Vec<DimensionItem>>,
    pub features: Json<serde_json::Value>,
    pub tasks: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Create a new extraction result with validation
    pub fn new(
        project_id: Uuid,
        version: i32,
        dimensions: Vec<DimensionItem>,
        features: serde_json::Value,
        tasks: Vec<String>,
    ) -> Result<Self> {
        if version < 1 {
            return Err(Error::Validation(
                "Extraction result version must be ≥1".to_string(),
            ));
        }
        if dimensions.is_empty() {
            return Err(Error::Validation(
                "Extraction result must contain at least one dimension".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(ExtractionResult {
            id: Uuid::new_v4(),
            project_id,
            version,
            dimensions: Json(dimensions),
            features: Json(features),
            tasks: Json(tasks),
            created_at: now,
            updated_at: now,
        })
    }

    /// Look up a dimension value by name
    pub fn dimension(&self, name: &str) -> Option<f64> {
        self.dimensions
            .0
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dims() -> Vec<DimensionItem> {
        vec![
            DimensionItem {
                name: "overall_length_mm".to_string(),
                value: 120.0,
                unit: "mm".to_string(),
                confidence: 0.95,
                source: "user_reference".to_string(),
            },
            DimensionItem {
                name: "overall_width".to_string(),
                value: 54.0,
                unit: "mm".to_string(),
                confidence: 0.55,
                source: "ratio_estimation".to_string(),
            },
        ]
    }

    #[test]
    fn test_scale_reference_validation() {
        let project_id = Uuid::new_v4();

        assert!(ScaleReference::new(
            project_id,
            "overall_length_mm".to_string(),
            120.0,
            "mm".to_string()
        )
        .is_ok());

        assert!(
            ScaleReference::new(project_id, "".to_string(), 120.0, "mm".to_string()).is_err()
        );
        assert!(
            ScaleReference::new(project_id, "x".to_string(), 0.0, "mm".to_string()).is_err()
        );
        assert!(
            ScaleReference::new(project_id, "x".to_string(), -5.0, "mm".to_string()).is_err()
        );
        assert!(
            ScaleReference::new(project_id, "x".to_string(), f64::NAN, "mm".to_string()).is_err()
        );
    }

    #[test]
    fn test_extraction_result_validation() {
        let project_id = Uuid::new_v4();

        assert!(ExtractionResult::new(project_id, 1, dims(), json!([]), vec![]).is_ok());
        assert!(ExtractionResult::new(project_id, 0, dims(), json!([]), vec![]).is_err());
        assert!(ExtractionResult::new(project_id, 1, vec![], json!([]), vec![]).is_err());
    }

    #[test]
    fn test_dimension_lookup() {
        let result =
            ExtractionResult::new(Uuid::new_v4(), 1, dims(), json!([]), vec![]).unwrap();

        assert_eq!(result.dimension("overall_length_mm"), Some(120.0));
        assert_eq!(result.dimension("overall_width"), Some(54.0));
        assert_eq!(result.dimension("hole_diameter"), None);
    }
}
