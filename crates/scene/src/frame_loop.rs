//! Frame scheduling. The window's redraw callback asks the loop to run a frame;
//! the loop says whether another one should be requested.

use std::fmt::Display;

use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
    failed_frames: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            frames: 0,
            failed_frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Tick the scene and hand it to `submit`. A failed submit is logged and the
    /// loop keeps going. Returns `true` while another frame should be scheduled;
    /// once stopped the scene is left untouched.
    pub fn run_frame<F, E>(&mut self, scene: &mut Scene, elapsed_seconds: f64, submit: F) -> bool
    where
        F: FnOnce(&Scene) -> Result<(), E>,
        E: Display,
    {
        if self.state == LoopState::Stopped {
            return false;
        }
        scene.tick(elapsed_seconds);
        if let Err(e) = submit(scene) {
            self.failed_frames += 1;
            log::error!("Frame {} failed: {}", self.frames, e);
        }
        self.frames += 1;
        self.state == LoopState::Running
    }

    /// Stop scheduling. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == LoopState::Running {
            log::info!("Frame loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Capabilities, SceneSettings};
    use rand::{rngs::StdRng, SeedableRng};

    fn scene() -> Scene {
        let settings = SceneSettings {
            capabilities: Capabilities {
                textures: false,
                patrol_craft: true,
                debris_field: false,
            },
            ..Default::default()
        };
        Scene::new(settings, 320, 240, StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn runs_until_torn_down() {
        let mut scene = scene();
        let mut frames = FrameLoop::new();
        let mut submitted = 0;
        for i in 0..3 {
            assert!(frames.run_frame(&mut scene, i as f64, |_| {
                submitted += 1;
                Ok::<(), String>(())
            }));
        }
        assert_eq!(submitted, 3);
        assert_eq!(scene.frame(), 3);

        frames.teardown();
        assert_eq!(frames.state(), LoopState::Stopped);
        assert!(!frames.run_frame(&mut scene, 4.0, |_| {
            submitted += 1;
            Ok::<(), String>(())
        }));
        assert_eq!(submitted, 3);
        assert_eq!(scene.frame(), 3);
        frames.teardown();
        assert!(!frames.is_running());
    }

    #[test]
    fn failed_submit_does_not_stop_the_loop() {
        let mut scene = scene();
        let mut frames = FrameLoop::new();
        assert!(frames.run_frame(&mut scene, 0.0, |_| Err("surface lost")));
        assert!(frames.run_frame(&mut scene, 0.1, |_| Ok::<(), &str>(())));
        assert_eq!(frames.failed_frames(), 1);
        assert_eq!(frames.frames(), 2);
        assert_eq!(scene.frame(), 2);
    }
}
