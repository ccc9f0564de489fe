//! Per-variant specialization of an image prompt.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::reference::VarianceFactor;

/// How one image variant departs from the base concept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, alias = "camera_angle", skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
}

impl VariationSpec {
    pub fn get(&self, factor: VarianceFactor) -> Option<&str> {
        let value = match factor {
            VarianceFactor::Lighting => &self.lighting,
            VarianceFactor::Environment => &self.environment,
            VarianceFactor::CameraAngle => &self.camera_angle,
            VarianceFactor::Materials => &self.materials,
        };
        value.as_deref()
    }

    pub fn set(&mut self, factor: VarianceFactor, value: impl Into<String>) {
        let slot = match factor {
            VarianceFactor::Lighting => &mut self.lighting,
            VarianceFactor::Environment => &mut self.environment,
            VarianceFactor::CameraAngle => &mut self.camera_angle,
            VarianceFactor::Materials => &mut self.materials,
        };
        *slot = Some(value.into());
    }

    /// Present, non-blank fields in canonical factor order.
    pub fn fields(&self) -> impl Iterator<Item = (VarianceFactor, &str)> + '_ {
        VarianceFactor::ALL.iter().filter_map(move |factor| {
            self.get(*factor)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (*factor, value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_skip_blank_and_keep_order() {
        let mut spec = VariationSpec::default();
        spec.set(VarianceFactor::Materials, "brushed steel");
        spec.set(VarianceFactor::Lighting, "golden hour");
        spec.set(VarianceFactor::Environment, "  ");

        let fields: Vec<_> = spec.fields().collect();
        assert_eq!(
            fields,
            vec![
                (VarianceFactor::Lighting, "golden hour"),
                (VarianceFactor::Materials, "brushed steel"),
            ]
        );
        assert!(!spec.is_empty());
        assert!(VariationSpec::default().is_empty());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let spec: VariationSpec =
            serde_json::from_str(r#"{"cameraAngle":"low angle","lighting":"neon"}"#).unwrap();
        assert_eq!(spec.get(VarianceFactor::CameraAngle), Some("low angle"));
        assert_eq!(spec.materials, None);
    }
}
