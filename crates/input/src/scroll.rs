//! Eased page scroll. Wheel input moves a target offset; the visible offset glides
//! toward it over a fixed duration, and every change is reported as progress
//! through the page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Scrollable height of the virtual page in pixels.
    #[serde(default = "default_page_height")]
    pub page_height: f32,
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f32,
    /// Seconds a scroll animation takes to settle.
    #[serde(default = "default_duration")]
    pub duration: f32,
}

fn default_page_height() -> f32 {
    4000.0
}
fn default_wheel_multiplier() -> f32 {
    1.0
}
fn default_duration() -> f32 {
    1.2
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            page_height: default_page_height(),
            wheel_multiplier: default_wheel_multiplier(),
            duration: default_duration(),
        }
    }
}

/// Exponential ease-out, reaching 1 slightly before `t = 1`.
pub fn ease_out_expo(t: f32) -> f32 {
    (1.001 - 2f32.powf(-10.0 * t)).min(1.0)
}

#[derive(Debug, Clone)]
struct Animation {
    from: f32,
    to: f32,
    elapsed: f32,
}

#[derive(Debug, Clone)]
pub struct SmoothScroll {
    settings: ScrollSettings,
    offset: f32,
    target: f32,
    animation: Option<Animation>,
}

impl SmoothScroll {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            offset: 0.0,
            target: 0.0,
            animation: None,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn page_height(&self) -> f32 {
        self.settings.page_height
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Offset as a fraction of the page, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.settings.page_height <= 0.0 {
            return 0.0;
        }
        (self.offset / self.settings.page_height).clamp(0.0, 1.0)
    }

    /// Wheel movement in page pixels (positive scrolls down).
    pub fn wheel(&mut self, delta_px: f32) {
        if delta_px == 0.0 {
            return;
        }
        let target = self.target + delta_px * self.settings.wheel_multiplier;
        self.scroll_to(target);
    }

    /// Start an eased scroll toward `offset`, clamped to the page.
    pub fn scroll_to(&mut self, offset: f32) {
        self.target = offset.clamp(0.0, self.settings.page_height.max(0.0));
        log::trace!("Scroll target {:.0}px", self.target);
        self.animation = Some(Animation {
            from: self.offset,
            to: self.target,
            elapsed: 0.0,
        });
    }

    /// Advance the animation by `dt` seconds. Returns the new progress when the
    /// visible offset moved.
    pub fn update(&mut self, dt: f32) -> Option<f32> {
        let anim = self.animation.as_mut()?;
        anim.elapsed += dt.max(0.0);
        let t = if self.settings.duration > 0.0 {
            (anim.elapsed / self.settings.duration).min(1.0)
        } else {
            1.0
        };
        let before = self.offset;
        self.offset = if t >= 1.0 {
            anim.to
        } else {
            anim.from + (anim.to - anim.from) * ease_out_expo(t)
        };
        if t >= 1.0 {
            self.animation = None;
        }
        (self.offset != before).then(|| self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_starts_at_zero_and_saturates() {
        assert!(ease_out_expo(0.0).abs() < 0.002);
        assert_eq!(ease_out_expo(1.0), 1.0);
        assert_eq!(ease_out_expo(2.0), 1.0);
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_out_expo(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn wheel_glides_to_target_over_duration() {
        let mut scroll = SmoothScroll::new(ScrollSettings::default());
        scroll.wheel(1000.0);
        assert_eq!(scroll.target(), 1000.0);
        let first = scroll.update(0.1).unwrap();
        assert!(first > 0.0 && first < 0.25);
        let mut frames = 0;
        while scroll.is_animating() {
            scroll.update(1.0 / 60.0);
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(scroll.offset(), 1000.0);
        assert!((scroll.progress() - 0.25).abs() < 1e-6);
        assert!(scroll.update(1.0 / 60.0).is_none());
    }

    #[test]
    fn target_is_clamped_to_page() {
        let settings = ScrollSettings {
            page_height: 500.0,
            ..Default::default()
        };
        let mut scroll = SmoothScroll::new(settings);
        scroll.wheel(-300.0);
        assert_eq!(scroll.target(), 0.0);
        scroll.wheel(10_000.0);
        assert_eq!(scroll.target(), 500.0);
        scroll.update(5.0);
        assert_eq!(scroll.progress(), 1.0);
    }

    #[test]
    fn new_wheel_input_retargets_from_current_offset() {
        let mut scroll = SmoothScroll::new(ScrollSettings::default());
        scroll.wheel(400.0);
        scroll.update(0.2);
        let mid = scroll.offset();
        scroll.wheel(400.0);
        assert_eq!(scroll.target(), 800.0);
        scroll.update(0.0);
        assert!((scroll.offset() - mid).abs() < 1.0);
    }
}
