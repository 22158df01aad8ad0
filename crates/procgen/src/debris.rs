//! Debris belt placement. Instances are laid out once; afterwards the whole batch
//! only rotates as a rigid group.

use engine_core::Transform;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::PI;

/// Slab the debris is scattered through: a band along X between two distances,
/// with a vertical and a depth spread around fixed centres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisBand {
    pub x_min: f32,
    pub x_max: f32,
    pub half_height: f32,
    pub depth_center: f32,
    pub half_depth: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for DebrisBand {
    fn default() -> Self {
        // Sits in the gap between the rust world and the banded giant.
        Self {
            x_min: 120.0,
            x_max: 180.0,
            half_height: 25.0,
            depth_center: -40.0,
            half_depth: 30.0,
            min_scale: 0.5,
            max_scale: 2.0,
        }
    }
}

impl DebrisBand {
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.x_min
            && p.x <= self.x_max
            && p.y.abs() <= self.half_height
            && (p.z - self.depth_center).abs() <= self.half_depth
    }
}

/// Lay out `count` rocks inside `band` with random orientation and uniform scale.
pub fn scatter_debris<R: Rng + ?Sized>(count: usize, band: &DebrisBand, rng: &mut R) -> Vec<Transform> {
    (0..count)
        .map(|_| {
            let position = Vec3::new(
                band.x_min + rng.gen::<f32>() * (band.x_max - band.x_min),
                (rng.gen::<f32>() - 0.5) * 2.0 * band.half_height,
                band.depth_center + (rng.gen::<f32>() - 0.5) * 2.0 * band.half_depth,
            );
            let euler = Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, rng.gen::<f32>() * PI);
            let scale = band.min_scale + rng.gen::<f32>() * (band.max_scale - band.min_scale);
            Transform::from_euler_scale(position, euler, scale)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debris_lands_inside_band_with_bounded_scale() {
        let band = DebrisBand::default();
        let mut rng = StdRng::seed_from_u64(2024);
        let rocks = scatter_debris(2000, &band, &mut rng);
        assert_eq!(rocks.len(), 2000);
        for t in &rocks {
            assert!(band.contains(t.position), "{:?}", t.position);
            assert!(t.scale.x >= band.min_scale && t.scale.x <= band.max_scale);
            assert_eq!(t.scale.x, t.scale.y);
            assert_eq!(t.scale.y, t.scale.z);
        }
    }

    #[test]
    fn zero_count_is_an_empty_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(scatter_debris(0, &DebrisBand::default(), &mut rng).is_empty());
    }
}
