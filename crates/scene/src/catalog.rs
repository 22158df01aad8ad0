//! The fixed set of bodies the backdrop is built from, in navigation order.

use glam::Vec3;
use procgen::SurfaceKind;

/// Flat material parameters. Used directly for untextured bodies and as the
/// fallback when a surface texture cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub albedo: u32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub roughness: f32,
}

impl MaterialParams {
    pub const fn flat(albedo: u32) -> Self {
        Self {
            albedo,
            emissive: 0x000000,
            emissive_intensity: 0.0,
            roughness: 0.8,
        }
    }
}

/// Extra surface shell drawn just above the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Bands,
    Craters,
}

impl DetailKind {
    pub fn surface(self) -> SurfaceKind {
        match self {
            DetailKind::Bands => SurfaceKind::BandedGiant,
            DetailKind::Craters => SurfaceKind::CrateredWorld,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub name: String,
    pub position: Vec3,
    pub radius: f32,
    /// Surface texture recipe; `None` keeps the flat material.
    pub surface: Option<SurfaceKind>,
    pub material: MaterialParams,
    /// Glow shell tint as `0xRRGGBB`.
    pub glow: Option<u32>,
    pub clouds: bool,
    pub rings: bool,
    pub detail: Option<DetailKind>,
}

impl BodySpec {
    fn new(name: &str, position: Vec3, radius: f32, material: MaterialParams) -> Self {
        Self {
            name: name.to_string(),
            position,
            radius,
            surface: None,
            material,
            glow: None,
            clouds: false,
            rings: false,
            detail: None,
        }
    }

    fn surface(mut self, kind: SurfaceKind) -> Self {
        self.surface = Some(kind);
        self
    }

    fn glow(mut self, tint: u32) -> Self {
        self.glow = Some(tint);
        self
    }

    fn clouds(mut self) -> Self {
        self.clouds = true;
        self
    }

    fn rings(mut self) -> Self {
        self.rings = true;
        self
    }

    fn detail(mut self, kind: DetailKind) -> Self {
        self.detail = Some(kind);
        self
    }
}

/// Earth, Mars, Jupiter, Saturn, Moon. Index order is the navigation order.
pub fn default_catalog() -> Vec<BodySpec> {
    vec![
        BodySpec::new("earth", Vec3::new(0.0, 0.0, 0.0), 8.0, MaterialParams::flat(0x1a4d8f))
            .surface(SurfaceKind::OceanWorld)
            .glow(0x4488ff)
            .clouds(),
        BodySpec::new("mars", Vec3::new(100.0, 20.0, -30.0), 6.0, MaterialParams::flat(0xcc4422))
            .surface(SurfaceKind::RustWorld)
            .glow(0xff6644),
        BodySpec::new("jupiter", Vec3::new(200.0, -10.0, -50.0), 15.0, MaterialParams::flat(0xd4a574))
            .surface(SurfaceKind::BandedGiant)
            .glow(0xffcc99),
        BodySpec::new(
            "saturn",
            Vec3::new(300.0, 15.0, -40.0),
            12.0,
            MaterialParams {
                albedo: 0xe8d4a0,
                emissive: 0xa89968,
                emissive_intensity: 0.2,
                roughness: 0.7,
            },
        )
        .rings()
        .detail(DetailKind::Bands),
        BodySpec::new("moon", Vec3::new(50.0, 10.0, 10.0), 4.0, MaterialParams::flat(0x888888))
            .surface(SurfaceKind::CrateredWorld),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_uniquely_named_bodies() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 5);
        let mut names: Vec<_> = catalog.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn only_ocean_world_has_clouds_and_only_ringed_body_has_rings() {
        let catalog = default_catalog();
        assert_eq!(catalog.iter().filter(|b| b.clouds).count(), 1);
        assert_eq!(catalog[0].surface, Some(SurfaceKind::OceanWorld));
        assert!(catalog[0].clouds);
        assert_eq!(catalog.iter().filter(|b| b.rings).count(), 1);
        assert!(catalog[3].rings && catalog[3].surface.is_none());
        assert!(catalog[4].glow.is_none());
    }
}
