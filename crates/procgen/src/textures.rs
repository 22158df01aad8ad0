//! Procedural surface textures for the celestial bodies.
//! Each surface kind has its own draw recipe; output is a plain RGBA buffer that the
//! renderer uploads once at startup.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use rand::prelude::*;
use std::f32::consts::TAU;

use crate::color::hex_rgb;

pub const DEFAULT_TEXTURE_WIDTH: u32 = 1024;
pub const DEFAULT_TEXTURE_HEIGHT: u32 = 512;
/// Largest surface we are willing to allocate for synthesis.
pub const MAX_TEXTURE_DIMENSION: u32 = 8192;

/// Number of angular samples used to perturb landmass outlines.
const BLOB_EDGE_SAMPLES: usize = 64;

/// RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
            a: 255,
        }
    }

    pub fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            g: (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            b: (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            a: (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Surface recipes available to the body registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Ocean with scattered continents and highland patches.
    OceanWorld,
    /// Red plains, dark patches, white polar caps.
    RustWorld,
    /// Horizontal cloud bands with a single storm.
    BandedGiant,
    /// Grey regolith peppered with craters.
    CrateredWorld,
    /// Transparent sheet of soft white blobs, blended additively over a surface.
    CloudMask,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 5] = [
        SurfaceKind::OceanWorld,
        SurfaceKind::RustWorld,
        SurfaceKind::BandedGiant,
        SurfaceKind::CrateredWorld,
        SurfaceKind::CloudMask,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SurfaceKind::OceanWorld => "ocean-world",
            SurfaceKind::RustWorld => "rust-world",
            SurfaceKind::BandedGiant => "banded-giant",
            SurfaceKind::CrateredWorld => "cratered-world",
            SurfaceKind::CloudMask => "cloud-mask",
        }
    }
}

/// Width and height of a synthesized texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDims {
    pub width: u32,
    pub height: u32,
}

impl Default for TextureDims {
    fn default() -> Self {
        Self {
            width: DEFAULT_TEXTURE_WIDTH,
            height: DEFAULT_TEXTURE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureError {
    #[error("cannot acquire a {width}x{height} drawing surface")]
    SurfaceUnavailable { width: u32, height: u32 },
}

/// Generated texture data
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl TextureData {
    /// Acquire a drawing surface filled with `fill`.
    pub fn acquire(dims: TextureDims, fill: Pixel) -> Result<Self, TextureError> {
        let TextureDims { width, height } = dims;
        if width == 0 || height == 0 || width > MAX_TEXTURE_DIMENSION || height > MAX_TEXTURE_DIMENSION {
            return Err(TextureError::SurfaceUnavailable { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
        })
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            Pixel::TRANSPARENT
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&pixel.to_bytes());
        }
        bytes
    }

    /// Source-over composite of `color` at `alpha` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Vec3, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || alpha <= 0.0 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let dst = self.pixels[idx];
        let dst_a = dst.a as f32 / 255.0;
        let dst_rgb = Vec3::new(dst.r as f32, dst.g as f32, dst.b as f32) / 255.0;
        let a = alpha.min(1.0);
        let out_a = a + dst_a * (1.0 - a);
        let rgb = if out_a > 0.0 {
            (color * a + dst_rgb * dst_a * (1.0 - a)) / out_a
        } else {
            Vec3::ZERO
        };
        self.pixels[idx] = Pixel::from_rgba(rgb.x, rgb.y, rgb.z, out_a);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Vec3, alpha: f32) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;
        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                self.blend(px, py, color, alpha);
            }
        }
    }

    /// Fill every pixel whose centre lies inside the region described by `inside`,
    /// scanning the box `[cx ± reach] x [cy ± reach_y]`.
    fn fill_region(
        &mut self,
        cx: f32,
        cy: f32,
        reach_x: f32,
        reach_y: f32,
        color: Vec3,
        mut coverage: impl FnMut(f32, f32) -> f32,
    ) {
        let x0 = (cx - reach_x).floor().max(0.0) as i64;
        let x1 = (cx + reach_x).ceil().min(self.width as f32 - 1.0) as i64;
        let y0 = (cy - reach_y).floor().max(0.0) as i64;
        let y1 = (cy + reach_y).ceil().min(self.height as f32 - 1.0) as i64;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let a = coverage(px as f32 + 0.5 - cx, py as f32 + 0.5 - cy);
                self.blend(px, py, color, a);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Vec3, alpha: f32) {
        let r2 = radius * radius;
        self.fill_region(cx, cy, radius, radius, color, |dx, dy| {
            if dx * dx + dy * dy <= r2 {
                alpha
            } else {
                0.0
            }
        });
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Vec3, alpha: f32) {
        self.fill_region(cx, cy, rx, ry, color, |dx, dy| {
            let n = (dx / rx).powi(2) + (dy / ry).powi(2);
            if n <= 1.0 {
                alpha
            } else {
                0.0
            }
        });
    }

    /// Circle whose opacity falls off smoothly toward the rim.
    fn fill_soft_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Vec3, alpha: f32) {
        self.fill_region(cx, cy, radius, radius, color, |dx, dy| {
            let d = (dx * dx + dy * dy).sqrt() / radius;
            alpha * (1.0 - smooth_step(0.6, 1.0, d))
        });
    }

    /// Circle whose radius is scaled per direction by `edge` (sampled around the rim).
    fn fill_blob(&mut self, cx: f32, cy: f32, radius: f32, edge: &[f32], color: Vec3) {
        let max_scale = edge.iter().copied().fold(1.0_f32, f32::max);
        let reach = radius * max_scale;
        let samples = edge.len() as f32;
        self.fill_region(cx, cy, reach, reach, color, |dx, dy| {
            let angle = dy.atan2(dx).rem_euclid(TAU);
            let pos = angle / TAU * samples;
            let i = pos.floor() as usize % edge.len();
            let j = (i + 1) % edge.len();
            let f = pos.fract();
            let limit = radius * (edge[i] * (1.0 - f) + edge[j] * f);
            if dx * dx + dy * dy <= limit * limit {
                1.0
            } else {
                0.0
            }
        });
    }
}

/// Draw a texture for `kind`. Randomness comes from `rng`; output is not meant to be
/// reproducible across runs, but a seeded rng gives identical textures.
pub fn synthesize<R: Rng + ?Sized>(
    kind: SurfaceKind,
    dims: TextureDims,
    rng: &mut R,
) -> Result<TextureData, TextureError> {
    let texture = match kind {
        SurfaceKind::OceanWorld => ocean_world(dims, rng)?,
        SurfaceKind::RustWorld => rust_world(dims, rng)?,
        SurfaceKind::BandedGiant => banded_giant(dims, rng)?,
        SurfaceKind::CrateredWorld => cratered_world(dims, rng)?,
        SurfaceKind::CloudMask => cloud_mask(dims, rng)?,
    };
    log::debug!(
        "synthesized {} texture ({}x{})",
        kind.label(),
        texture.width,
        texture.height
    );
    Ok(texture)
}

/// Pixel scale relative to the 1024-wide reference layout.
fn layout_scale(dims: TextureDims) -> f32 {
    dims.width as f32 / DEFAULT_TEXTURE_WIDTH as f32
}

fn ocean_world<R: Rng + ?Sized>(dims: TextureDims, rng: &mut R) -> Result<TextureData, TextureError> {
    const CONTINENTS: usize = 40;
    let ocean = Pixel::from_hex(0x1a4d8f);
    let land = hex_rgb(0x2d5a2d);
    let highland = hex_rgb(0x4a3c31);

    let mut tex = TextureData::acquire(dims, ocean)?;
    let s = layout_scale(dims);
    let (w, h) = (dims.width as f32, dims.height as f32);
    let perlin = Perlin::new(rng.gen());

    for _ in 0..CONTINENTS {
        let x = rng.gen::<f32>() * w;
        let y = rng.gen::<f32>() * h;
        let radius = (50.0 + rng.gen::<f32>() * 100.0) * s;

        // Coastline: radius scaled by low-frequency noise sampled around a circle.
        let ox = rng.gen::<f64>() * 100.0;
        let oy = rng.gen::<f64>() * 100.0;
        let edge: Vec<f32> = (0..BLOB_EDGE_SAMPLES)
            .map(|i| {
                let a = i as f64 / BLOB_EDGE_SAMPLES as f64 * std::f64::consts::TAU;
                let n = perlin.get([ox + a.cos() * 1.5, oy + a.sin() * 1.5]);
                (1.0 + 0.3 * n as f32).max(0.4)
            })
            .collect();
        tex.fill_blob(x, y, radius, &edge, land);

        tex.fill_circle(x + 20.0 * s, y + 10.0 * s, radius * 0.4, highland, 1.0);
    }

    Ok(tex)
}

fn rust_world<R: Rng + ?Sized>(dims: TextureDims, rng: &mut R) -> Result<TextureData, TextureError> {
    const PATCHES: usize = 100;
    let mut tex = TextureData::acquire(dims, Pixel::from_hex(0xcc4422))?;
    let s = layout_scale(dims);
    let (w, h) = (dims.width as f32, dims.height as f32);
    let patch = hex_rgb(0x882211);

    for _ in 0..PATCHES {
        let x = rng.gen::<f32>() * w;
        let y = rng.gen::<f32>() * h;
        let radius = (10.0 + rng.gen::<f32>() * 40.0) * s;
        tex.fill_circle(x, y, radius, patch, 0.3);
    }

    let cap = (40.0 * s).max(1.0);
    tex.fill_rect(0.0, 0.0, w, cap, Vec3::ONE, 0.8);
    tex.fill_rect(0.0, h - cap, w, cap, Vec3::ONE, 0.8);
    Ok(tex)
}

fn banded_giant<R: Rng + ?Sized>(dims: TextureDims, rng: &mut R) -> Result<TextureData, TextureError> {
    const BANDS: usize = 20;
    const STREAKS_PER_BAND: usize = 5;
    const PALETTE: [u32; 5] = [0xd4a574, 0xb8956a, 0xe8d4a0, 0xa89968, 0xd4a574];

    let mut tex = TextureData::acquire(dims, Pixel::from_hex(PALETTE[0]))?;
    let s = layout_scale(dims);
    let (w, h) = (dims.width as f32, dims.height as f32);
    let band_height = h / BANDS as f32;

    for i in 0..BANDS {
        let top = i as f32 * band_height;
        tex.fill_rect(0.0, top, w, band_height, hex_rgb(PALETTE[i % PALETTE.len()]), 1.0);
        for _ in 0..STREAKS_PER_BAND {
            let y = top + rng.gen::<f32>() * band_height;
            tex.fill_rect(0.0, y, w, (2.0 * s).max(1.0), Vec3::ZERO, 0.1);
        }
    }

    tex.fill_ellipse(w * 0.7, h * 0.6, 60.0 * s, 30.0 * s, hex_rgb(0xdd4444), 1.0);
    Ok(tex)
}

fn cratered_world<R: Rng + ?Sized>(dims: TextureDims, rng: &mut R) -> Result<TextureData, TextureError> {
    const CRATERS: usize = 200;
    let mut tex = TextureData::acquire(dims, Pixel::from_hex(0x888888))?;
    let s = layout_scale(dims);
    let (w, h) = (dims.width as f32, dims.height as f32);
    let crater = hex_rgb(0x555555);

    for _ in 0..CRATERS {
        let x = rng.gen::<f32>() * w;
        let y = rng.gen::<f32>() * h;
        let radius = (2.0 + rng.gen::<f32>() * 15.0) * s;
        tex.fill_circle(x, y, radius, crater, 1.0);
    }
    Ok(tex)
}

fn cloud_mask<R: Rng + ?Sized>(dims: TextureDims, rng: &mut R) -> Result<TextureData, TextureError> {
    const CLOUDS: usize = 100;
    let mut tex = TextureData::acquire(dims, Pixel::TRANSPARENT)?;
    let s = layout_scale(dims);
    let (w, h) = (dims.width as f32, dims.height as f32);

    for _ in 0..CLOUDS {
        let x = rng.gen::<f32>() * w;
        let y = rng.gen::<f32>() * h;
        let radius = (20.0 + rng.gen::<f32>() * 50.0) * s;
        let alpha = 0.2 + rng.gen::<f32>() * 0.3;
        tex.fill_soft_circle(x, y, radius, Vec3::ONE, alpha);
    }
    Ok(tex)
}

fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: TextureDims = TextureDims { width: 256, height: 128 };

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn every_kind_fills_the_requested_surface() {
        let mut rng = rng();
        for kind in SurfaceKind::ALL {
            let tex = synthesize(kind, SMALL, &mut rng).expect("surface");
            assert_eq!(tex.width, 256);
            assert_eq!(tex.height, 128);
            assert_eq!(tex.pixels.len(), 256 * 128, "{}", kind.label());
            assert_eq!(tex.to_bytes().len(), 256 * 128 * 4);
        }
    }

    #[test]
    fn degenerate_surface_is_refused() {
        let mut rng = rng();
        let err = synthesize(SurfaceKind::RustWorld, TextureDims { width: 0, height: 512 }, &mut rng)
            .unwrap_err();
        assert_eq!(err, TextureError::SurfaceUnavailable { width: 0, height: 512 });
        let huge = TextureDims { width: MAX_TEXTURE_DIMENSION + 1, height: 4 };
        assert!(synthesize(SurfaceKind::CloudMask, huge, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_pixels() {
        let a = synthesize(SurfaceKind::OceanWorld, SMALL, &mut rng()).unwrap();
        let b = synthesize(SurfaceKind::OceanWorld, SMALL, &mut rng()).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn ocean_world_has_sea_land_and_highlands() {
        let tex = synthesize(SurfaceKind::OceanWorld, SMALL, &mut rng()).unwrap();
        assert!(tex.pixels.iter().all(|p| p.a == 255));
        for colour in [0x1a4d8f, 0x2d5a2d, 0x4a3c31] {
            let want = Pixel::from_hex(colour);
            assert!(tex.pixels.contains(&want), "missing #{colour:06x}");
        }
    }

    #[test]
    fn rust_world_has_bright_polar_caps() {
        let tex = synthesize(SurfaceKind::RustWorld, SMALL, &mut rng()).unwrap();
        for y in [0, tex.height - 1] {
            for x in [0, tex.width / 2, tex.width - 1] {
                let p = tex.get_pixel(x, y);
                assert!(p.r > 200 && p.g > 180 && p.b > 180, "cap pixel {p:?}");
            }
        }
    }

    #[test]
    fn banded_giant_storm_sits_at_fixed_spot() {
        let tex = synthesize(SurfaceKind::BandedGiant, SMALL, &mut rng()).unwrap();
        let storm = tex.get_pixel((tex.width as f32 * 0.7) as u32, (tex.height as f32 * 0.6) as u32);
        assert_eq!(storm, Pixel::from_hex(0xdd4444));
    }

    #[test]
    fn cratered_world_uses_two_greys() {
        let tex = synthesize(SurfaceKind::CrateredWorld, SMALL, &mut rng()).unwrap();
        let base = Pixel::from_hex(0x888888);
        let crater = Pixel::from_hex(0x555555);
        assert!(tex.pixels.iter().all(|p| *p == base || *p == crater));
        assert!(tex.pixels.contains(&crater));
    }

    #[test]
    fn cloud_mask_is_white_over_transparent() {
        let tex = synthesize(SurfaceKind::CloudMask, TextureDims::default(), &mut rng()).unwrap();
        assert!(tex.pixels.iter().any(|p| p.a == 0));
        assert!(tex.pixels.iter().any(|p| p.a > 0));
        for p in tex.pixels.iter().filter(|p| p.a > 0) {
            assert!(p.r >= 254 && p.g >= 254 && p.b >= 254, "tinted cloud pixel {p:?}");
        }
    }
}
