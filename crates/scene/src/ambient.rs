//! Ambient field: star tiers, nebula panels and the optional debris belt.

use engine_core::Transform;
use glam::{Mat4, Quat};
use procgen::{
    generate_star_tier, scatter_debris, scatter_nebula_panels, ColorJitter, DebrisBand, NebulaPanel, Shell,
    StarPoint, DEFAULT_STAR_TIERS,
};
use rand::Rng;

/// Spin per frame of the slowest tier; tier `i` turns `(i + 1)` times as fast.
pub const STAR_SPIN_STEP: f32 = 0.0001;
pub const DEBRIS_SPIN_Y: f32 = 0.0005;
pub const DEBRIS_SPIN_Z: f32 = 0.0002;

/// One immutable point cloud with its own slow rotation about Y.
#[derive(Debug, Clone)]
pub struct StarTier {
    pub points: Vec<StarPoint>,
    pub size: f32,
    pub spin_rate: f32,
    pub rotation: f32,
}

impl StarTier {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }
}

/// Rocks placed once and then rotated only as a rigid group.
#[derive(Debug, Clone)]
pub struct DebrisField {
    pub instances: Vec<Transform>,
    pub rotation_y: f32,
    pub rotation_z: f32,
}

impl DebrisField {
    pub fn new<R: Rng + ?Sized>(count: usize, band: &DebrisBand, rng: &mut R) -> Self {
        Self {
            instances: scatter_debris(count, band, rng),
            rotation_y: 0.0,
            rotation_z: 0.0,
        }
    }

    pub fn advance(&mut self) {
        self.rotation_y += DEBRIS_SPIN_Y;
        self.rotation_z += DEBRIS_SPIN_Z;
    }

    /// Group transform applied on top of every instance.
    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(glam::EulerRot::XYZ, 0.0, self.rotation_y, self.rotation_z))
    }
}

#[derive(Debug, Clone)]
pub struct AmbientField {
    pub star_tiers: Vec<StarTier>,
    pub nebulae: Vec<NebulaPanel>,
    pub debris: Option<DebrisField>,
}

impl AmbientField {
    pub fn new<R: Rng + ?Sized>(nebula_count: usize, debris_count: Option<usize>, rng: &mut R) -> Self {
        let star_tiers = DEFAULT_STAR_TIERS
            .iter()
            .enumerate()
            .map(|(i, spec)| StarTier {
                points: generate_star_tier(spec, Shell::default(), ColorJitter::default(), rng),
                size: spec.size,
                spin_rate: STAR_SPIN_STEP * (i + 1) as f32,
                rotation: 0.0,
            })
            .collect();
        let nebulae = scatter_nebula_panels(nebula_count, rng);
        let debris = debris_count.map(|count| DebrisField::new(count, &DebrisBand::default(), rng));
        Self {
            star_tiers,
            nebulae,
            debris,
        }
    }

    pub fn spin_stars(&mut self) {
        for tier in &mut self.star_tiers {
            tier.rotation += tier.spin_rate;
        }
    }

    pub fn rotate_debris(&mut self) {
        if let Some(debris) = &mut self.debris {
            debris.advance();
        }
    }

    pub fn star_count(&self) -> usize {
        self.star_tiers.iter().map(|t| t.points.len()).sum()
    }
}
