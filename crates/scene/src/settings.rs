//! Scene tuning: capability flags and the handful of counts and rates the backdrop
//! is built from. Embedded in the binary's `orrery.ron`.

use procgen::TextureDims;
use serde::{Deserialize, Serialize};

/// Optional subsystems. All on by default; turning one off drops its entities
/// entirely rather than hiding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Synthesize surface textures. Off means every body uses its flat material.
    #[serde(default = "default_true")]
    pub textures: bool,
    #[serde(default = "default_true")]
    pub patrol_craft: bool,
    #[serde(default = "default_true")]
    pub debris_field: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            textures: true,
            patrol_craft: true,
            debris_field: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Texture width in pixels.
    #[serde(default = "default_texture_width")]
    pub texture_width: u32,
    /// Texture height in pixels.
    #[serde(default = "default_texture_height")]
    pub texture_height: u32,
    /// Fraction of the remaining distance the camera closes each frame.
    #[serde(default = "default_camera_blend")]
    pub camera_blend: f32,
    #[serde(default = "default_comet_count")]
    pub comet_count: usize,
    /// Head positions kept per comet trail.
    #[serde(default = "default_trail_length")]
    pub trail_length: usize,
    #[serde(default = "default_debris_count")]
    pub debris_count: usize,
    #[serde(default = "default_nebula_count")]
    pub nebula_count: usize,
    /// Patrol progress added per frame (a full loop takes `1 / increment` frames).
    #[serde(default = "default_patrol_increment")]
    pub patrol_increment: f32,
}

fn default_true() -> bool {
    true
}
fn default_texture_width() -> u32 {
    procgen::DEFAULT_TEXTURE_WIDTH
}
fn default_texture_height() -> u32 {
    procgen::DEFAULT_TEXTURE_HEIGHT
}
fn default_camera_blend() -> f32 {
    0.05
}
fn default_comet_count() -> usize {
    5
}
fn default_trail_length() -> usize {
    50
}
fn default_debris_count() -> usize {
    2000
}
fn default_nebula_count() -> usize {
    3
}
fn default_patrol_increment() -> f32 {
    0.0003
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            texture_width: default_texture_width(),
            texture_height: default_texture_height(),
            camera_blend: default_camera_blend(),
            comet_count: default_comet_count(),
            trail_length: default_trail_length(),
            debris_count: default_debris_count(),
            nebula_count: default_nebula_count(),
            patrol_increment: default_patrol_increment(),
        }
    }
}

impl SceneSettings {
    pub fn texture_dims(&self) -> TextureDims {
        TextureDims {
            width: self.texture_width,
            height: self.texture_height,
        }
    }
}
