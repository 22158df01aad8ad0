//! Colour helpers: hex decoding, HSL jitter and sRGB → linear conversion.

use glam::Vec3;

/// Decode a `0xRRGGBB` literal into sRGB components in [0, 1].
pub fn hex_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Hue, saturation, lightness, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

pub fn rgb_to_hsl(rgb: Vec3) -> Hsl {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let l = (max + min) * 0.5;
    if (max - min).abs() < f32::EPSILON {
        return Hsl { h: 0.0, s: 0.0, l };
    }
    let d = max - min;
    let s = if l <= 0.5 { d / (max + min) } else { d / (2.0 - max - min) };
    let h = if max == rgb.x {
        (rgb.y - rgb.z) / d + if rgb.y < rgb.z { 6.0 } else { 0.0 }
    } else if max == rgb.y {
        (rgb.z - rgb.x) / d + 2.0
    } else {
        (rgb.x - rgb.y) / d + 4.0
    };
    Hsl { h: h / 6.0, s, l }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Vec3 {
    if hsl.s == 0.0 {
        return Vec3::splat(hsl.l);
    }
    let q = if hsl.l <= 0.5 {
        hsl.l * (1.0 + hsl.s)
    } else {
        hsl.l + hsl.s - hsl.l * hsl.s
    };
    let p = 2.0 * hsl.l - q;
    Vec3::new(
        hue_channel(p, q, hsl.h + 1.0 / 3.0),
        hue_channel(p, q, hsl.h),
        hue_channel(p, q, hsl.h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Shift a colour in HSL space. Hue wraps, saturation and lightness clamp.
pub fn offset_hsl(rgb: Vec3, dh: f32, ds: f32, dl: f32) -> Vec3 {
    let hsl = rgb_to_hsl(rgb);
    hsl_to_rgb(Hsl {
        h: (hsl.h + dh).rem_euclid(1.0),
        s: (hsl.s + ds).clamp(0.0, 1.0),
        l: (hsl.l + dl).clamp(0.0, 1.0),
    })
}

/// sRGB-encoded component to linear light (vertex colours go through an sRGB surface).
pub fn srgb_to_linear(c: Vec3) -> Vec3 {
    fn channel(v: f32) -> f32 {
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    }
    Vec3::new(channel(c.x), channel(c.y), channel(c.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_decodes_channels() {
        let c = hex_rgb(0xff8000);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn hsl_round_trips_saturated_colour() {
        let rgb = hex_rgb(0xaaaaff);
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        assert!((back - rgb).abs().max_element() < 1e-5);
    }

    #[test]
    fn offset_hsl_clamps_lightness() {
        let white = offset_hsl(Vec3::ONE, 0.03, 0.0, 0.5);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
        let black = offset_hsl(Vec3::ZERO, 0.0, 0.2, -0.3);
        assert_eq!(black, Vec3::ZERO);
    }
}
