//! Starfield tiers and nebula panels for the backdrop.
//!
//! Stars are scattered uniformly through a spherical shell. Inclination is drawn
//! as `acos(2u - 1)` so the density does not bunch up at the poles.

use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::color::{hex_rgb, offset_hsl};

/// One density/size/colour tier of the starfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarTierSpec {
    pub count: usize,
    /// Point size in world units.
    pub size: f32,
    /// Base colour as `0xRRGGBB`.
    pub color: u32,
}

/// Dim-and-many through bright-and-few.
pub const DEFAULT_STAR_TIERS: [StarTierSpec; 5] = [
    StarTierSpec { count: 5000, size: 0.3, color: 0xffffff },
    StarTierSpec { count: 3000, size: 0.6, color: 0xffffff },
    StarTierSpec { count: 1500, size: 1.0, color: 0xaaaaff },
    StarTierSpec { count: 800, size: 1.5, color: 0xffffaa },
    StarTierSpec { count: 200, size: 2.0, color: 0xffcccc },
];

/// Radii bounding the star shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    pub inner: f32,
    pub outer: f32,
}

impl Default for Shell {
    fn default() -> Self {
        Self { inner: 300.0, outer: 600.0 }
    }
}

/// Maximum HSL jitter applied to each star's colour (full width of the range).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorJitter {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Default for ColorJitter {
    fn default() -> Self {
        Self {
            hue: 0.1,
            saturation: 0.3,
            lightness: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    /// sRGB colour in [0, 1].
    pub color: Vec3,
}

/// Uniform sample in the shell between `shell.inner` and `shell.outer`.
pub fn sample_shell_point<R: Rng + ?Sized>(shell: Shell, rng: &mut R) -> Vec3 {
    let radius = shell.inner + rng.gen::<f32>() * (shell.outer - shell.inner);
    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Scatter one tier's points.
pub fn generate_star_tier<R: Rng + ?Sized>(
    spec: &StarTierSpec,
    shell: Shell,
    jitter: ColorJitter,
    rng: &mut R,
) -> Vec<StarPoint> {
    let base = hex_rgb(spec.color);
    (0..spec.count)
        .map(|_| {
            let position = sample_shell_point(shell, rng);
            let color = offset_hsl(
                base,
                (rng.gen::<f32>() - 0.5) * jitter.hue,
                (rng.gen::<f32>() - 0.5) * jitter.saturation,
                (rng.gen::<f32>() - 0.5) * jitter.lightness,
            );
            StarPoint { position, color }
        })
        .collect()
}

/// A translucent backdrop plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NebulaPanel {
    pub position: Vec3,
    /// Rotation about the panel normal, radians.
    pub roll: f32,
    pub size: f32,
    pub color: u32,
    pub opacity: f32,
}

/// Place `count` panels behind the scene, each one further back than the last.
pub fn scatter_nebula_panels<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<NebulaPanel> {
    (0..count)
        .map(|i| NebulaPanel {
            position: Vec3::new(
                (rng.gen::<f32>() - 0.5) * 400.0,
                (rng.gen::<f32>() - 0.5) * 200.0,
                -100.0 - i as f32 * 50.0,
            ),
            roll: rng.gen::<f32>() * PI,
            size: 500.0,
            color: 0x220044,
            opacity: 0.1,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_points_stay_between_radii() {
        let mut rng = StdRng::seed_from_u64(7);
        let shell = Shell::default();
        for _ in 0..2000 {
            let r = sample_shell_point(shell, &mut rng).length();
            assert!(r >= shell.inner - 1e-3 && r <= shell.outer + 1e-3, "r = {r}");
        }
    }

    /// Inverse-CDF inclination keeps the z-distribution flat: each hemisphere band of
    /// equal height holds roughly the same share of points.
    #[test]
    fn shell_sampling_does_not_cluster_at_poles() {
        let mut rng = StdRng::seed_from_u64(11);
        let shell = Shell { inner: 1.0, outer: 1.0 };
        let n = 20_000;
        let mut polar = 0;
        let mut equatorial = 0;
        for _ in 0..n {
            let z = sample_shell_point(shell, &mut rng).z;
            if z.abs() > 0.8 {
                polar += 1;
            } else if z.abs() < 0.2 {
                equatorial += 1;
            }
        }
        // Both bands cover 20% of the height, so both should hold ~20% of points.
        let expected = n as f32 * 0.2;
        assert!((polar as f32 - expected).abs() < expected * 0.1, "polar {polar}");
        assert!((equatorial as f32 - expected).abs() < expected * 0.1, "equatorial {equatorial}");
    }

    #[test]
    fn tier_has_requested_count_and_nearby_colours() {
        let mut rng = StdRng::seed_from_u64(3);
        let spec = DEFAULT_STAR_TIERS[2];
        let stars = generate_star_tier(&spec, Shell::default(), ColorJitter::default(), &mut rng);
        assert_eq!(stars.len(), spec.count);
        let base = hex_rgb(spec.color);
        for s in &stars {
            assert!((s.color - base).abs().max_element() < 0.5);
            assert!(s.color.min_element() >= 0.0 && s.color.max_element() <= 1.0);
        }
    }

    #[test]
    fn nebula_panels_step_backwards() {
        let mut rng = StdRng::seed_from_u64(5);
        let panels = scatter_nebula_panels(3, &mut rng);
        assert_eq!(panels.len(), 3);
        for (i, p) in panels.iter().enumerate() {
            assert_eq!(p.position.z, -100.0 - 50.0 * i as f32);
            assert!(p.roll >= 0.0 && p.roll < PI);
        }
    }
}
