// Scene description exchanged with the UI layer: the objects placed in the
// scene and the camera position, stored as a JSON document for save/load.

use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

use crate::options::Rgb;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One placed object. `data` is the mesh payload, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub data: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(default = "Rgb::white")]
    pub color: Rgb,
    #[serde(default)]
    pub pos: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Written as `[]` when unset, matching what the UI layer emits.
    #[serde(
        default,
        rename = "cameraPos",
        serialize_with = "write_camera_pos",
        deserialize_with = "read_camera_pos"
    )]
    pub camera_pos: Option<[f32; 3]>,
}

fn unit_scale() -> f32 {
    1.0
}

fn read_camera_pos<'de, D>(deserializer: D) -> std::result::Result<Option<[f32; 3]>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<f32>::deserialize(deserializer)?;
    match raw.as_slice() {
        [] => Ok(None),
        [x, y, z] => Ok(Some([*x, *y, *z])),
        other => Err(serde::de::Error::invalid_length(
            other.len(),
            &"an empty list or three coordinates",
        )),
    }
}

fn write_camera_pos<S>(pos: &Option<[f32; 3]>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match pos {
        Some(pos) => pos.serialize(serializer),
        None => Vec::<f32>::new().serialize(serializer),
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

impl SceneDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: Self = serde_json::from_str(text).context("invalid scene document")?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document; a missing file is an empty scene.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write scene {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for object in &self.objects {
            object.color.validate()?;
            if !object.pos.iter().all(|c| c.is_finite()) {
                bail!("object {:?} has a non-finite position", object.label);
            }
            if !object.scale.is_finite() || object.scale <= 0.0 {
                bail!("object {:?} has invalid scale {}", object.label, object.scale);
            }
        }
        if let Some(pos) = self.camera_pos {
            if !pos.iter().all(|c| c.is_finite()) {
                bail!("camera position must be finite");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "objects": [
            {"data": "v 0 0 0", "type": "mesh", "label": "cube",
             "color": [0.5, 0.25, 1.0], "pos": [1.0, 2.0, 3.0], "scale": 2.0}
        ],
        "cameraPos": [0.0, 4.0, 9.0]
    }"#;

    #[test]
    fn parses_ui_document() {
        let doc = SceneDocument::from_json(DOC).unwrap();
        assert_eq!(doc.objects.len(), 1);
        assert_eq!(doc.objects[0].kind, "mesh");
        assert_eq!(doc.objects[0].color, Rgb([0.5, 0.25, 1.0]));
        assert_eq!(doc.camera_pos, Some([0.0, 4.0, 9.0]));
    }

    #[test]
    fn empty_camera_list_means_unset() {
        let doc = SceneDocument::from_json(r#"{"objects": [], "cameraPos": []}"#).unwrap();
        assert_eq!(doc.camera_pos, None);
        assert!(doc.to_json().unwrap().contains("\"cameraPos\": []"));
    }

    #[test]
    fn rejects_two_component_camera() {
        assert!(SceneDocument::from_json(r#"{"cameraPos": [1.0, 2.0]}"#).is_err());
    }

    #[test]
    fn object_defaults() {
        let doc =
            SceneDocument::from_json(r#"{"objects": [{"data": "", "type": "t", "label": "l"}]}"#)
                .unwrap();
        let object = &doc.objects[0];
        assert_eq!(object.color, Rgb::white());
        assert_eq!(object.pos, [0.0; 3]);
        assert_eq!(object.scale, 1.0);
    }

    #[test]
    fn rejects_zero_scale() {
        let text = r#"{"objects": [{"data": "", "type": "t", "label": "l", "scale": 0.0}]}"#;
        assert!(SceneDocument::from_json(text).is_err());
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenes").join("one.json");
        let doc = SceneDocument::from_json(DOC).unwrap();
        doc.save_to(&path).unwrap();
        assert_eq!(SceneDocument::load_from(&path).unwrap(), doc);
    }

    #[test]
    fn missing_file_is_empty_scene() {
        let dir = tempfile::tempdir().unwrap();
        let doc = SceneDocument::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(doc, SceneDocument::default());
    }
}
