//! The scene: owns every entity and the camera director, and advances them all in
//! a fixed order once per frame.

use glam::Vec3;
use rand::rngs::StdRng;

use crate::actors::{Comet, PatrolCraft, SpawnBox};
use crate::ambient::AmbientField;
use crate::bodies::{BodyRegistry, TextureOptions, BODY_SPIN_PER_FRAME};
use crate::catalog::{default_catalog, BodySpec};
use crate::director::CameraDirector;
use crate::navigation::{decompose_progress, NavigationSignal};
use crate::settings::SceneSettings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("viewport {width}x{height} has no area")]
    InvalidViewport { width: u32, height: u32 },
    #[error("{name} = {value} is outside {range}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        range: &'static str,
    },
}

/// Reject tuning values that would let the camera overshoot or the patrol
/// progress leave `[0, 1)`.
fn validate(settings: &SceneSettings) -> Result<(), SceneError> {
    let blend = settings.camera_blend;
    if !(blend > 0.0 && blend <= 1.0) {
        return Err(SceneError::InvalidSetting {
            name: "camera_blend",
            value: blend.to_string(),
            range: "(0, 1]",
        });
    }
    let step = settings.patrol_increment;
    if !(step > 0.0 && step < 1.0) {
        return Err(SceneError::InvalidSetting {
            name: "patrol_increment",
            value: step.to_string(),
            range: "(0, 1)",
        });
    }
    Ok(())
}

/// Drawing surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

pub struct Scene {
    settings: SceneSettings,
    viewport: Viewport,
    pub bodies: BodyRegistry,
    pub ambient: AmbientField,
    pub comets: Vec<Comet>,
    pub craft: Option<PatrolCraft>,
    pub director: CameraDirector,
    spawn_box: SpawnBox,
    body_positions: Vec<Vec3>,
    rng: StdRng,
    frame: u64,
}

impl Scene {
    /// Build the default five-body scene.
    pub fn new(settings: SceneSettings, width: u32, height: u32, rng: StdRng) -> Result<Self, SceneError> {
        Self::with_catalog(settings, &default_catalog(), width, height, rng)
    }

    pub fn with_catalog(
        settings: SceneSettings,
        catalog: &[BodySpec],
        width: u32,
        height: u32,
        mut rng: StdRng,
    ) -> Result<Self, SceneError> {
        let viewport = Viewport::new(width, height)?;
        validate(&settings)?;
        let caps = settings.capabilities;
        log::info!(
            "Building scene: textures={} patrol_craft={} debris_field={}",
            caps.textures,
            caps.patrol_craft,
            caps.debris_field
        );

        let textures = TextureOptions {
            enabled: caps.textures,
            dims: settings.texture_dims(),
        };
        let mut bodies = BodyRegistry::new();
        for spec in catalog {
            bodies.create_body(spec, textures, &mut rng);
        }
        let body_positions: Vec<Vec3> = bodies.iter().map(|b| b.position()).collect();

        let ambient = AmbientField::new(
            settings.nebula_count,
            caps.debris_field.then_some(settings.debris_count),
            &mut rng,
        );

        let spawn_box = SpawnBox::default();
        let comets = (0..settings.comet_count)
            .map(|_| Comet::spawn(&spawn_box, settings.trail_length, &mut rng))
            .collect();

        let craft = caps
            .patrol_craft
            .then(|| PatrolCraft::new(&body_positions, settings.patrol_increment, &mut rng));

        let director = CameraDirector::new(settings.camera_blend);
        log::info!(
            "Scene ready: {} bodies, {} stars, {} comets",
            bodies.len(),
            ambient.star_count(),
            settings.comet_count
        );

        Ok(Self {
            settings,
            viewport,
            bodies,
            ambient,
            comets,
            craft,
            director,
            spawn_box,
            body_positions,
            rng,
            frame: 0,
        })
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Zero-area sizes (a minimised window) are rejected and the old viewport kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        self.viewport = Viewport::new(width, height)?;
        Ok(())
    }

    pub fn focus(&mut self, index: usize) {
        self.director.focus(&self.bodies, index);
    }

    pub fn focus_blend(&mut self, current: usize, next: usize, t: f32) {
        self.director.focus_blend(&self.bodies, current, next, t);
    }

    pub fn navigate(&mut self, signal: NavigationSignal) {
        match signal {
            NavigationSignal::Section(index) => self.focus(index),
            NavigationSignal::Progress(p) => {
                if let Some(split) = decompose_progress(p, self.bodies.len()) {
                    self.focus_blend(split.current, split.next, split.t);
                }
            }
        }
    }

    /// Advance one frame: body spin, star spin, comets, patrol craft, debris,
    /// then camera smoothing.
    pub fn tick(&mut self, elapsed_seconds: f64) {
        self.bodies.spin_all(BODY_SPIN_PER_FRAME);
        self.ambient.spin_stars();
        for comet in &mut self.comets {
            comet.advance(&self.spawn_box, &mut self.rng);
        }
        if let Some(craft) = &mut self.craft {
            craft.advance(&self.body_positions, elapsed_seconds, &mut self.rng);
        }
        self.ambient.rotate_debris();
        self.director.smooth();
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::FOCUS_OFFSET;
    use crate::settings::Capabilities;
    use rand::SeedableRng;

    fn light_settings() -> SceneSettings {
        SceneSettings {
            capabilities: Capabilities {
                textures: false,
                ..Default::default()
            },
            debris_count: 100,
            ..Default::default()
        }
    }

    fn scene() -> Scene {
        Scene::new(light_settings(), 800, 600, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn zero_viewport_is_fatal() {
        let err = Scene::new(light_settings(), 0, 600, StdRng::seed_from_u64(1)).err();
        assert_eq!(err, Some(SceneError::InvalidViewport { width: 0, height: 600 }));
        assert!(Scene::new(light_settings(), 800, 0, StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn camera_blend_above_one_is_rejected() {
        let settings = SceneSettings {
            camera_blend: 1.8,
            ..light_settings()
        };
        let err = Scene::new(settings, 800, 600, StdRng::seed_from_u64(1)).err();
        assert_eq!(
            err,
            Some(SceneError::InvalidSetting {
                name: "camera_blend",
                value: "1.8".to_string(),
                range: "(0, 1]",
            })
        );
        for blend in [0.0, -0.5, f32::NAN] {
            let settings = SceneSettings {
                camera_blend: blend,
                ..light_settings()
            };
            assert!(Scene::new(settings, 800, 600, StdRng::seed_from_u64(1)).is_err());
        }
        let settings = SceneSettings {
            camera_blend: 1.0,
            ..light_settings()
        };
        assert!(Scene::new(settings, 800, 600, StdRng::seed_from_u64(1)).is_ok());
    }

    #[test]
    fn negative_patrol_increment_is_rejected() {
        let settings = SceneSettings {
            patrol_increment: -0.01,
            ..light_settings()
        };
        let err = Scene::new(settings, 800, 600, StdRng::seed_from_u64(1)).err();
        assert_eq!(
            err,
            Some(SceneError::InvalidSetting {
                name: "patrol_increment",
                value: "-0.01".to_string(),
                range: "(0, 1)",
            })
        );
        for step in [0.0, 1.0, 2.5] {
            let settings = SceneSettings {
                patrol_increment: step,
                ..light_settings()
            };
            assert!(Scene::new(settings, 800, 600, StdRng::seed_from_u64(1)).is_err());
        }
    }

    #[test]
    fn resize_keeps_previous_viewport_on_zero_area() {
        let mut scene = scene();
        scene.resize(1920, 1080).unwrap();
        assert!((scene.viewport().aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!(scene.resize(0, 0).is_err());
        assert_eq!(scene.viewport(), Viewport { width: 1920, height: 1080 });
    }

    #[test]
    fn focus_then_200_ticks_settles_on_body() {
        let mut scene = scene();
        assert_eq!(scene.bodies.len(), 5);
        scene.focus(2);
        for i in 0..200 {
            scene.tick(i as f64 / 60.0);
        }
        let p2 = scene.bodies.position_of(2).unwrap();
        let cam = scene.director.current();
        assert!(cam.position.abs_diff_eq(p2 + FOCUS_OFFSET, 0.05), "{:?}", cam.position);
        assert!(cam.look_at.abs_diff_eq(p2, 0.05), "{:?}", cam.look_at);
    }

    #[test]
    fn blend_right_after_construction_targets_midpoint() {
        let mut scene = scene();
        scene.focus_blend(0, 1, 0.5);
        let p0 = scene.bodies.position_of(0).unwrap();
        let p1 = scene.bodies.position_of(1).unwrap();
        assert!(scene.director.target().look_at.abs_diff_eq((p0 + p1) * 0.5, 1e-4));
    }

    #[test]
    fn progress_signal_blends_neighbouring_bodies() {
        let mut scene = scene();
        scene.navigate(NavigationSignal::Progress(0.375));
        let p1 = scene.bodies.position_of(1).unwrap();
        let p2 = scene.bodies.position_of(2).unwrap();
        assert!(scene.director.target().look_at.abs_diff_eq(p1.lerp(p2, 0.5), 1e-3));

        scene.navigate(NavigationSignal::Section(4));
        assert_eq!(scene.director.target().look_at, scene.bodies.position_of(4).unwrap());
        scene.navigate(NavigationSignal::Section(12));
        assert_eq!(scene.director.target().look_at, scene.bodies.position_of(4).unwrap());
    }

    #[test]
    fn capabilities_drop_optional_subsystems() {
        let settings = SceneSettings {
            capabilities: Capabilities {
                textures: false,
                patrol_craft: false,
                debris_field: false,
            },
            ..Default::default()
        };
        let mut scene = Scene::new(settings, 640, 480, StdRng::seed_from_u64(3)).unwrap();
        assert!(scene.craft.is_none());
        assert!(scene.ambient.debris.is_none());
        scene.tick(0.0);
        assert_eq!(scene.frame(), 1);
        assert_eq!(scene.comets.len(), 5);
    }

    #[test]
    fn tick_advances_every_subsystem() {
        let mut scene = scene();
        scene.tick(0.5);
        assert!(scene.bodies.iter().all(|b| (b.spin() - BODY_SPIN_PER_FRAME).abs() < 1e-7));
        assert!(scene.ambient.star_tiers.iter().all(|t| t.rotation > 0.0));
        assert!(scene.ambient.debris.as_ref().unwrap().rotation_y > 0.0);
        let craft = scene.craft.as_ref().unwrap();
        assert!(craft.progress > 0.0);
        assert!(scene.comets.iter().all(|c| c.trail.len() == 50));
    }
}
