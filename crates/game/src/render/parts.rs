//! Looks of the transient actors: the patrol saucer's part list and comet geometry.

use glam::{Mat4, Quat, Vec3};
use procgen::{hex_rgb, srgb_to_linear};
use renderer::{InstanceData, LineVertex};
use scene::{Comet, PatrolCraft};
use std::f32::consts::TAU;

pub const COMET_HEAD_RADIUS: f32 = 0.5;
pub const COMET_HEAD_COLOR: u32 = 0xaaddff;
pub const TRAIL_COLOR: u32 = 0x6699ff;
pub const TRAIL_OPACITY: f32 = 0.5;
/// Longest trail segment drawn. Comets move under two units a frame, so a longer
/// segment is the jump back into the spawn box and would streak across the scene.
pub const TRAIL_BREAK_DISTANCE: f32 = 20.0;

/// Hull frustum radii and height (top, bottom, height).
pub const HULL_SHAPE: (f32, f32, f32) = (3.0, 5.0, 1.0);
const RIM_LIGHT_COUNT: usize = 8;
const RIM_LIGHT_RADIUS: f32 = 4.5;

/// Which shared mesh a craft part is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartMesh {
    /// Capped frustum, `HULL_SHAPE`.
    Hull,
    /// Upper unit hemisphere.
    Dome,
    /// Unit sphere.
    Sphere,
}

/// A single component of the patrol saucer, relative to the craft origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftPart {
    pub offset: Vec3,
    pub scale: f32,
    pub mesh: PartMesh,
    pub color: u32,
    pub opacity: f32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    /// Rim lights ignore the light rig.
    pub lit: bool,
}

impl CraftPart {
    const fn new(offset: Vec3, scale: f32, mesh: PartMesh, color: u32) -> Self {
        Self {
            offset,
            scale,
            mesh,
            color,
            opacity: 1.0,
            emissive: 0x000000,
            emissive_intensity: 0.0,
            lit: true,
        }
    }

    const fn glowing(mut self, emissive: u32, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    const fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    const fn unlit(mut self) -> Self {
        self.lit = false;
        self
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }

    /// GPU instance under the craft's world matrix.
    pub fn instance(&self, craft: Mat4) -> InstanceData {
        let model = craft * Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), Quat::IDENTITY, self.offset);
        let data = InstanceData::new(model, srgb_to_linear(hex_rgb(self.color)).extend(self.opacity).into());
        if self.lit {
            data.with_emissive(srgb_to_linear(hex_rgb(self.emissive)) * self.emissive_intensity)
        } else {
            data.unlit()
        }
    }
}

/// Hull, glass dome, pilot, eyes and the alternating red/green rim lights.
pub fn craft_parts() -> Vec<CraftPart> {
    let mut parts = vec![
        CraftPart::new(Vec3::ZERO, 1.0, PartMesh::Hull, 0xcccccc).glowing(0x4444ff, 0.3),
        CraftPart::new(Vec3::new(0.0, 0.5, 0.0), 2.0, PartMesh::Dome, 0x88ffff)
            .glowing(0x00ffff, 0.5)
            .translucent(0.7),
        CraftPart::new(Vec3::new(0.0, 0.8, 0.0), 0.8, PartMesh::Sphere, 0x00ff00).glowing(0x00aa00, 0.5),
        CraftPart::new(Vec3::new(-0.3, 0.9, 0.6), 0.2, PartMesh::Sphere, 0x000000).glowing(0xffff00, 1.0),
        CraftPart::new(Vec3::new(0.3, 0.9, 0.6), 0.2, PartMesh::Sphere, 0x000000).glowing(0xffff00, 1.0),
    ];
    parts.extend((0..RIM_LIGHT_COUNT).map(|i| {
        let angle = i as f32 / RIM_LIGHT_COUNT as f32 * TAU;
        let color = if i % 2 == 0 { 0xff0000 } else { 0x00ff00 };
        CraftPart::new(
            Vec3::new(angle.cos() * RIM_LIGHT_RADIUS, -0.3, angle.sin() * RIM_LIGHT_RADIUS),
            0.3,
            PartMesh::Sphere,
            color,
        )
        .unlit()
    }));
    parts
}

/// Craft pose: heading about Y, then the wobble about Z.
pub fn craft_matrix(craft: &PatrolCraft) -> Mat4 {
    Mat4::from_translation(craft.position) * Mat4::from_rotation_y(craft.yaw) * Mat4::from_rotation_z(craft.roll)
}

pub fn comet_head_instance(comet: &Comet) -> InstanceData {
    let model = Mat4::from_scale_rotation_translation(Vec3::splat(COMET_HEAD_RADIUS), Quat::IDENTITY, comet.position);
    InstanceData::new(model, srgb_to_linear(hex_rgb(COMET_HEAD_COLOR)).extend(1.0).into()).unlit()
}

/// Trail as a segment list, fading out toward the oldest point. Segments that
/// span a respawn are left out.
pub fn comet_trail_segments(comet: &Comet, out: &mut Vec<LineVertex>) {
    let points = comet.trail.points();
    if points.len() < 2 {
        return;
    }
    let color = srgb_to_linear(hex_rgb(TRAIL_COLOR));
    let last = (points.len() - 1) as f32;
    let vertex = |i: usize| LineVertex {
        position: points[i].into(),
        color: color.extend(TRAIL_OPACITY * (1.0 - i as f32 / last)).into(),
    };
    for i in 0..points.len() - 1 {
        if points[i].distance(points[i + 1]) > TRAIL_BREAK_DISTANCE {
            continue;
        }
        out.push(vertex(i));
        out.push(vertex(i + 1));
    }
}
