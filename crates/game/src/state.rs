//! Application state: the scene, its GPU mirror, and the navigation inputs that steer it.

use anyhow::Result;
use engine_core::FrameClock;
use input::{section_for_key, section_offset, InputState, SmoothScroll, SECTIONS};
use rand::{rngs::StdRng, SeedableRng};
use renderer::{Camera, Renderer};
use scene::{BodyRegistry, FrameLoop, NavigationSignal, Scene};
use std::sync::Arc;
use winit::window::Window;

use crate::config::OrreryConfig;
use crate::render::{scene_lighting, GpuScene};

pub struct OrreryState {
    pub(crate) renderer: Renderer,
    pub(crate) camera: Camera,
    pub(crate) scene: Scene,
    pub(crate) gpu: GpuScene,
    pub(crate) frames: FrameLoop,
    pub(crate) clock: FrameClock,
    pub(crate) input: InputState,
    pub(crate) scroll: SmoothScroll,
}

impl OrreryState {
    pub async fn new(window: Arc<Window>, config: &OrreryConfig) -> Result<Self> {
        let size = window.inner_size();
        let mut renderer = Renderer::new(window, config.vsync).await?;

        let rng = match config.seed {
            Some(seed) => {
                log::info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        let scene = Scene::new(config.scene.clone(), size.width, size.height, rng)?;

        let mut camera = Camera::default();
        camera.set_aspect(size.width, size.height);
        renderer.update_lighting(&scene_lighting());
        let gpu = GpuScene::new(&mut renderer, &scene, config.texture_dump_dir.as_deref());

        Ok(Self {
            renderer,
            camera,
            scene,
            gpu,
            frames: FrameLoop::new(),
            clock: FrameClock::new(),
            input: InputState::new(),
            scroll: SmoothScroll::new(config.scroll),
        })
    }

    /// Run one frame. Returns `false` once the loop has been torn down.
    pub(crate) fn frame(&mut self) -> bool {
        self.clock.tick();
        let dt = self.clock.delta_seconds();
        for signal in collect_navigation(&self.input, &mut self.scroll, &self.scene.bodies, dt) {
            self.scene.navigate(signal);
        }
        self.input.end_frame();

        let Self {
            renderer,
            camera,
            scene,
            gpu,
            frames,
            clock,
            ..
        } = self;
        let again = frames.run_frame(scene, clock.elapsed_seconds(), |scene| gpu.draw(renderer, scene, camera));
        if clock.frame_count() % 600 == 0 {
            log::debug!("{:.0} fps, {} failed frames", clock.fps(), frames.failed_frames());
        }
        again
    }

    /// Stop the loop and release GPU resources. Idempotent.
    pub(crate) fn teardown(&mut self) {
        if !self.frames.is_running() {
            return;
        }
        self.frames.teardown();
        self.gpu.destroy();
        self.renderer.destroy();
    }
}

/// Turn this frame's input into navigation signals. A number key both focuses its
/// section's body directly and starts the scroll glide to that section; scroll
/// movement reports progress through the page. A section whose body is not in the
/// registry still scrolls but focuses nothing.
pub fn collect_navigation(
    input: &InputState,
    scroll: &mut SmoothScroll,
    bodies: &BodyRegistry,
    dt: f32,
) -> Vec<NavigationSignal> {
    let mut signals = Vec::new();
    let wheel = input.wheel_px();
    if wheel != 0.0 {
        scroll.wheel(wheel);
    }
    if let Some(index) = input.keys_pressed().filter_map(section_for_key).last() {
        let section = SECTIONS[index];
        log::debug!("Section '{}' activated", section.id);
        match bodies.get(section.body) {
            Some(handle) => signals.push(NavigationSignal::Section(handle.index())),
            None => log::warn!("Section '{}' shows unknown body '{}'", section.id, section.body),
        }
        scroll.scroll_to(section_offset(index, scroll.page_height()));
    }
    if let Some(progress) = scroll.update(dt) {
        signals.push(NavigationSignal::Progress(progress));
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, KeyCode, ScrollSettings};
    use scene::{default_catalog, TextureOptions};

    fn registry_without(skip: &str) -> BodyRegistry {
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = BodyRegistry::new();
        let textures = TextureOptions {
            enabled: false,
            ..Default::default()
        };
        for spec in default_catalog().iter().filter(|s| s.name != skip) {
            registry.create_body(spec, textures, &mut rng);
        }
        registry
    }

    #[test]
    fn number_key_focuses_section_and_scrolls_there() {
        let bodies = registry_without("");
        let mut input = InputState::new();
        let mut scroll = SmoothScroll::new(ScrollSettings::default());
        input.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        let signals = collect_navigation(&input, &mut scroll, &bodies, 0.1);
        assert_eq!(signals[0], NavigationSignal::Section(2));
        assert!(matches!(signals.get(1), Some(NavigationSignal::Progress(_))));
        assert_eq!(scroll.target(), 2000.0);

        input.end_frame();
        let mut last = 0.0;
        for _ in 0..30 {
            for signal in collect_navigation(&input, &mut scroll, &bodies, 0.1) {
                if let NavigationSignal::Progress(p) = signal {
                    last = p;
                }
            }
        }
        assert!((last - 0.5).abs() < 1e-6);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn section_body_is_resolved_by_name() {
        // Without jupiter, saturn and the moon move down one index.
        let bodies = registry_without("jupiter");
        let mut input = InputState::new();
        let mut scroll = SmoothScroll::new(ScrollSettings::default());
        input.process_keyboard(KeyCode::Digit4, ElementState::Pressed);
        let signals = collect_navigation(&input, &mut scroll, &bodies, 0.1);
        assert_eq!(signals[0], NavigationSignal::Section(2));

        input.end_frame();
        input.process_keyboard(KeyCode::Digit3, ElementState::Pressed);
        let signals = collect_navigation(&input, &mut scroll, &bodies, 0.1);
        assert!(signals.iter().all(|s| matches!(s, NavigationSignal::Progress(_))));
        assert_eq!(scroll.target(), 2000.0);
    }

    #[test]
    fn idle_input_emits_nothing() {
        let bodies = registry_without("");
        let input = InputState::new();
        let mut scroll = SmoothScroll::new(ScrollSettings::default());
        assert!(collect_navigation(&input, &mut scroll, &bodies, 0.016).is_empty());
    }
}
