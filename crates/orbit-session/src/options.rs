// Initialization parameters captured once when a session is created.
//
// Later changes to these fields require a new session; only the camera offset
// has a live update path on the bridge.

use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};

use crate::scene::SceneDocument;

/// Default drag-to-rotation factor, radians per pixel.
pub const DEFAULT_MOVE_STRENGTH: f32 = 0.01;

/// Default environment-light intensity multiplier.
pub const DEFAULT_LIGHT_STRENGTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub fn white() -> Self {
        Self([1.0, 1.0, 1.0])
    }

    pub fn r(&self) -> f32 {
        self.0[0]
    }

    pub fn g(&self) -> f32 {
        self.0[1]
    }

    pub fn b(&self) -> f32 {
        self.0[2]
    }

    pub fn validate(&self) -> Result<()> {
        if !self.0.iter().all(|c| c.is_finite() && (0.0..=1.0).contains(c)) {
            bail!("color components must be within [0, 1], got {:?}", self.0);
        }
        Ok(())
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::white()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitOptions {
    #[serde(rename = "backgroundColor", default)]
    pub background_color: Rgb,
    #[serde(rename = "environmentLightColor", default)]
    pub environment_light_color: Rgb,
    #[serde(rename = "environmentLightStrength", default = "default_light_strength")]
    pub environment_light_strength: f32,
    #[serde(rename = "moveStrength", default = "default_move_strength")]
    pub move_strength: f32,
    #[serde(default)]
    pub scene: SceneDocument,
}

fn default_move_strength() -> f32 {
    DEFAULT_MOVE_STRENGTH
}

fn default_light_strength() -> f32 {
    DEFAULT_LIGHT_STRENGTH
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            background_color: Rgb::white(),
            environment_light_color: Rgb::white(),
            environment_light_strength: DEFAULT_LIGHT_STRENGTH,
            move_strength: DEFAULT_MOVE_STRENGTH,
            scene: SceneDocument::default(),
        }
    }
}

impl InitOptions {
    /// Parse the serialized options blob passed at session creation.
    pub fn from_json(text: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(text).context("invalid init options")?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Options from the earlier bridge revision, where the colours and the
    /// light strength were passed as individual floats. Drag sensitivity was
    /// not configurable there and the scene started empty.
    pub fn from_legacy(background: [f32; 3], light: [f32; 3], light_strength: f32) -> Self {
        Self {
            background_color: Rgb(background),
            environment_light_color: Rgb(light),
            environment_light_strength: light_strength,
            move_strength: DEFAULT_MOVE_STRENGTH,
            scene: SceneDocument::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.background_color
            .validate()
            .context("backgroundColor")?;
        self.environment_light_color
            .validate()
            .context("environmentLightColor")?;
        if !self.environment_light_strength.is_finite() || self.environment_light_strength < 0.0 {
            bail!(
                "environmentLightStrength must be a non-negative number, got {}",
                self.environment_light_strength
            );
        }
        if !self.move_strength.is_finite() || self.move_strength < 0.0 {
            bail!("moveStrength must be a non-negative number, got {}", self.move_strength);
        }
        self.scene.validate()
    }
}
