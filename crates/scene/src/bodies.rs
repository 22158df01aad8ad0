//! Celestial body registry. Bodies are created once, keep their position for the
//! life of the scene and only ever spin about their local Y axis.

use std::collections::HashMap;
use std::f32::consts::PI;

use engine_core::Transform;
use glam::{Mat4, Quat, Vec3};
use procgen::{hex_rgb, synthesize, SurfaceKind, TextureData, TextureDims};
use rand::Rng;

use crate::catalog::{BodySpec, DetailKind, MaterialParams};

/// Radians every body turns per frame.
pub const BODY_SPIN_PER_FRAME: f32 = 0.001;

pub const GLOW_SCALE: f32 = 1.15;
pub const GLOW_OPACITY: f32 = 0.2;
pub const CLOUD_SCALE: f32 = 1.02;
pub const CLOUD_OPACITY: f32 = 0.8;
pub const DETAIL_SCALE: f32 = 1.01;
pub const DETAIL_OPACITY: f32 = 0.35;
pub const RING_TILT: f32 = PI / 2.5;

/// Stable reference to a body. Only the registry hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

impl BodyHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum Material {
    Textured {
        texture: TextureData,
        surface: SurfaceKind,
        roughness: f32,
    },
    /// Colours are sRGB in [0, 1].
    Flat {
        albedo: Vec3,
        emissive: Vec3,
        emissive_intensity: f32,
        roughness: f32,
    },
}

impl Material {
    fn flat(params: &MaterialParams) -> Self {
        Material::Flat {
            albedo: hex_rgb(params.albedo),
            emissive: hex_rgb(params.emissive),
            emissive_intensity: params.emissive_intensity,
            roughness: params.roughness,
        }
    }

    pub fn texture(&self) -> Option<&TextureData> {
        match self {
            Material::Textured { texture, .. } => Some(texture),
            Material::Flat { .. } => None,
        }
    }

    pub fn roughness(&self) -> f32 {
        match self {
            Material::Textured { roughness, .. } | Material::Flat { roughness, .. } => *roughness,
        }
    }
}

/// How a decoration is blended over what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Alpha,
    Additive,
}

/// Something drawn with the body. Sizes are relative to the body radius so every
/// decoration follows the body's transform.
#[derive(Debug, Clone)]
pub enum Decoration {
    /// Back-faces only, so it reads as a halo around the silhouette.
    Glow { scale: f32, color: Vec3, opacity: f32 },
    Clouds { scale: f32, texture: TextureData, opacity: f32 },
    /// Flat annulus between `inner` and `outer` (times radius), tilted about X.
    Ring {
        inner: f32,
        outer: f32,
        tilt: f32,
        color: Vec3,
        opacity: f32,
    },
    Detail {
        kind: DetailKind,
        scale: f32,
        texture: TextureData,
        opacity: f32,
    },
}

impl Decoration {
    /// Transform relative to the body's unit sphere.
    pub fn local_transform(&self) -> Transform {
        match self {
            Decoration::Glow { scale, .. }
            | Decoration::Clouds { scale, .. }
            | Decoration::Detail { scale, .. } => Transform::from_scale(*scale),
            Decoration::Ring { tilt, .. } => Transform::default().with_rotation(Quat::from_rotation_x(*tilt)),
        }
    }

    pub fn blend(&self) -> Blend {
        match self {
            Decoration::Clouds { .. } => Blend::Additive,
            _ => Blend::Alpha,
        }
    }

    pub fn texture(&self) -> Option<&TextureData> {
        match self {
            Decoration::Clouds { texture, .. } | Decoration::Detail { texture, .. } => Some(texture),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    position: Vec3,
    pub radius: f32,
    pub material: Material,
    pub decorations: Vec<Decoration>,
    spin: f32,
}

impl Body {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// World transform of the unit sphere: scaled to radius, spun about Y.
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.position)
            .with_rotation(Quat::from_rotation_y(self.spin))
            .with_scale(Vec3::splat(self.radius))
    }

    /// World matrix of one decoration.
    pub fn decoration_matrix(&self, decoration: &Decoration) -> Mat4 {
        decoration.local_transform().under(self.transform().to_matrix())
    }
}

/// Texture production options for `create_body`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureOptions {
    pub enabled: bool,
    pub dims: TextureDims,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            dims: TextureDims::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    by_name: HashMap<String, BodyHandle>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a body and its decorations from `spec`. Surfaces that cannot be
    /// synthesized fall back to the flat material and the body is still created.
    pub fn create_body<R: Rng + ?Sized>(
        &mut self,
        spec: &BodySpec,
        textures: TextureOptions,
        rng: &mut R,
    ) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len());
        let make_texture = |kind: SurfaceKind, rng: &mut R| -> Option<TextureData> {
            if !textures.enabled {
                return None;
            }
            match synthesize(kind, textures.dims, rng) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::warn!("{}: {} texture unavailable ({}), using flat material", spec.name, kind.label(), e);
                    None
                }
            }
        };

        let material = spec
            .surface
            .and_then(|kind| {
                make_texture(kind, rng).map(|texture| Material::Textured {
                    texture,
                    surface: kind,
                    roughness: spec.material.roughness,
                })
            })
            .unwrap_or_else(|| Material::flat(&spec.material));

        let mut decorations = Vec::new();
        if let Some(tint) = spec.glow {
            decorations.push(Decoration::Glow {
                scale: GLOW_SCALE,
                color: hex_rgb(tint),
                opacity: GLOW_OPACITY,
            });
        }
        if spec.clouds {
            if let Some(texture) = make_texture(SurfaceKind::CloudMask, rng) {
                decorations.push(Decoration::Clouds {
                    scale: CLOUD_SCALE,
                    texture,
                    opacity: CLOUD_OPACITY,
                });
            }
        }
        if spec.rings {
            decorations.push(Decoration::Ring {
                inner: 1.5,
                outer: 2.5,
                tilt: RING_TILT,
                color: hex_rgb(0xc9b896),
                opacity: 0.7,
            });
            decorations.push(Decoration::Ring {
                inner: 1.3,
                outer: 1.45,
                tilt: RING_TILT,
                color: hex_rgb(0xa89968),
                opacity: 0.5,
            });
        }
        if let Some(kind) = spec.detail {
            if let Some(texture) = make_texture(kind.surface(), rng) {
                decorations.push(Decoration::Detail {
                    kind,
                    scale: DETAIL_SCALE,
                    texture,
                    opacity: DETAIL_OPACITY,
                });
            }
        }

        log::debug!(
            "Body {} '{}' at {:?} r={} ({} decorations)",
            handle.0,
            spec.name,
            spec.position,
            spec.radius,
            decorations.len()
        );

        if self.by_name.contains_key(&spec.name) {
            log::warn!("Duplicate body name '{}'; lookups keep the first", spec.name);
        } else {
            self.by_name.insert(spec.name.clone(), handle);
        }
        self.bodies.push(Body {
            name: spec.name.clone(),
            position: spec.position,
            radius: spec.radius,
            material,
            decorations,
            spin: 0.0,
        });
        handle
    }

    pub fn get(&self, name: &str) -> Option<BodyHandle> {
        self.by_name.get(name).copied()
    }

    pub fn get_index(&self, index: usize) -> Option<BodyHandle> {
        (index < self.bodies.len()).then_some(BodyHandle(index))
    }

    /// Handles are minted by this registry and bodies are never removed, so every
    /// handle it returned stays valid.
    pub fn body(&self, handle: BodyHandle) -> &Body {
        &self.bodies[handle.0]
    }

    /// Position of the body at `index`, if there is one.
    pub fn position_of(&self, index: usize) -> Option<Vec3> {
        self.bodies.get(index).map(Body::position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn spin_all(&mut self, increment: f32) {
        for body in &mut self.bodies {
            body.spin += increment;
        }
    }
}
