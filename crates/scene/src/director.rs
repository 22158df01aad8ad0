//! Camera director: navigation writes a target, each frame the current camera
//! closes a fixed fraction of the remaining distance.

use glam::Vec3;

use crate::bodies::BodyRegistry;

/// Where the camera sits relative to the body it is looking at.
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 30.0);
pub const START_POSITION: Vec3 = Vec3::new(0.0, 0.0, 50.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    fn focused_on(body: Vec3) -> Self {
        Self {
            position: body + FOCUS_OFFSET,
            look_at: body,
        }
    }

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraDirector {
    current: CameraPose,
    target: CameraPose,
    blend: f32,
}

impl CameraDirector {
    pub fn new(blend: f32) -> Self {
        let start = CameraPose {
            position: START_POSITION,
            look_at: Vec3::ZERO,
        };
        Self {
            current: start,
            target: start,
            blend,
        }
    }

    pub fn current(&self) -> CameraPose {
        self.current
    }

    pub fn target(&self) -> CameraPose {
        self.target
    }

    /// Aim at body `index`. Unknown indices leave the target untouched.
    pub fn focus(&mut self, registry: &BodyRegistry, index: usize) {
        match registry.position_of(index) {
            Some(p) => self.target = CameraPose::focused_on(p),
            None => log::debug!("focus({index}) ignored: no such body"),
        }
    }

    /// Aim between bodies `a` and `b`. `t` is not clamped, so values outside
    /// `[0, 1]` extrapolate along the same line.
    pub fn focus_blend(&mut self, registry: &BodyRegistry, a: usize, b: usize, t: f32) {
        match (registry.position_of(a), registry.position_of(b)) {
            (Some(pa), Some(pb)) => {
                self.target = CameraPose::focused_on(pa).lerp(CameraPose::focused_on(pb), t);
            }
            _ => log::debug!("focus_blend({a}, {b}, {t}) ignored: no such body"),
        }
    }

    /// One exponential step toward the target.
    pub fn smooth(&mut self) {
        self.current = self.current.lerp(self.target, self.blend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::TextureOptions;
    use crate::catalog::default_catalog;
    use rand::prelude::*;

    fn registry() -> BodyRegistry {
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = BodyRegistry::new();
        let textures = TextureOptions {
            enabled: false,
            ..Default::default()
        };
        for spec in default_catalog() {
            registry.create_body(&spec, textures, &mut rng);
        }
        registry
    }

    #[test]
    fn focus_targets_body_position() {
        let registry = registry();
        let mut director = CameraDirector::new(0.05);
        for i in 0..registry.len() {
            director.focus(&registry, i);
            let p = registry.position_of(i).unwrap();
            assert_eq!(director.target().look_at, p);
            assert_eq!(director.target().position, p + FOCUS_OFFSET);
        }
    }

    #[test]
    fn focus_blend_lerps_look_at_and_matches_endpoints() {
        let registry = registry();
        let mut director = CameraDirector::new(0.05);
        let (pa, pb) = (registry.position_of(1).unwrap(), registry.position_of(3).unwrap());
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            director.focus_blend(&registry, 1, 3, t);
            assert!(director.target().look_at.abs_diff_eq(pa.lerp(pb, t), 1e-4), "t = {t}");
        }

        let mut focused = CameraDirector::new(0.05);
        focused.focus(&registry, 1);
        director.focus_blend(&registry, 1, 3, 0.0);
        assert!(director.target().position.abs_diff_eq(focused.target().position, 1e-4));
        focused.focus(&registry, 3);
        director.focus_blend(&registry, 1, 3, 1.0);
        assert!(director.target().position.abs_diff_eq(focused.target().position, 1e-4));
    }

    #[test]
    fn out_of_range_t_extrapolates() {
        let registry = registry();
        let mut director = CameraDirector::new(0.05);
        let (pa, pb) = (registry.position_of(0).unwrap(), registry.position_of(1).unwrap());
        director.focus_blend(&registry, 0, 1, 1.5);
        assert!(director.target().look_at.abs_diff_eq(pa + (pb - pa) * 1.5, 1e-3));
    }

    #[test]
    fn unknown_bodies_are_a_no_op() {
        let registry = registry();
        let mut director = CameraDirector::new(0.05);
        director.focus(&registry, 2);
        let before = director.target();
        director.focus(&registry, 99);
        director.focus_blend(&registry, 0, 99, 0.5);
        director.focus_blend(&registry, 99, 0, 0.5);
        assert_eq!(director.target(), before);
    }

    #[test]
    fn smoothing_is_monotone_and_never_overshoots() {
        let registry = registry();
        let mut director = CameraDirector::new(0.05);
        director.focus(&registry, 3);
        let target = director.target();
        let mut last = (director.current().position - target.position).length();
        for _ in 0..500 {
            director.smooth();
            let pos = director.current().position;
            let d = (pos - target.position).length();
            // Strictly closer each frame until f32 spacing near the target dominates.
            if last > 1e-2 {
                assert!(d < last, "distance grew from {last} to {d}");
            } else {
                assert!(d <= last + 1e-4);
            }
            // Per axis the camera stays on the start side of the target.
            for axis in 0..3 {
                let start = START_POSITION[axis];
                let goal = target.position[axis];
                let lo = start.min(goal) - 1e-3;
                let hi = start.max(goal) + 1e-3;
                assert!(pos[axis] >= lo && pos[axis] <= hi);
            }
            last = d;
        }
        assert!(last < 1e-2);
    }
}
