//! Window event handling.

use winit::event::WindowEvent;

use crate::state::OrreryState;

impl OrreryState {
    /// Handle a window event. Returns `true` when the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                true
            }
            WindowEvent::Resized(size) => {
                match self.scene.resize(size.width, size.height) {
                    Ok(()) => {
                        self.renderer.resize(size);
                        self.camera.set_aspect(size.width, size.height);
                    }
                    // Minimised: keep the last good viewport.
                    Err(e) => log::debug!("Ignoring resize: {}", e),
                }
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                if self.input.is_quit_pressed() {
                    log::info!("Escape pressed, shutting down");
                    self.teardown();
                    return true;
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.process_wheel(delta);
                false
            }
            WindowEvent::RedrawRequested => {
                if self.frame() {
                    self.renderer.window.request_redraw();
                    false
                } else {
                    true
                }
            }
            _ => false,
        }
    }
}
