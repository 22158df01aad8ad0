//! Rendering: GPU resources for the scene and the per-frame pass order.

pub mod parts;

use glam::{Mat4, Vec3};
use procgen::{hex_rgb, srgb_to_linear, TextureData};
use renderer::{
    save_rgba_png, Camera, InstanceData, Lighting, LineVertex, Mesh, MeshData, MeshPass, RenderError, Renderer,
    StarInstance, TextureId,
};
use scene::{Decoration, Material, Scene};
use std::collections::HashMap;
use std::f32::consts::PI;
use std::path::Path;

use parts::{comet_head_instance, comet_trail_segments, craft_matrix, craft_parts, CraftPart, PartMesh, HULL_SHAPE};

const SUN_POSITION: Vec3 = Vec3::new(-100.0, 0.0, 0.0);
const SUN_INTENSITY: f32 = 2.0;
const SUN_RANGE: f32 = 1000.0;
const AMBIENT_COLOR: u32 = 0x404040;
const STAR_OPACITY: f32 = 0.9;
const DEBRIS_COLOR: u32 = 0x888888;
const DEBRIS_RADIUS: f32 = 0.5;
const NEBULA_PANEL_SIZE: f32 = 500.0;

/// The fixed light rig: dim grey ambient plus a white point sun off to the left.
pub fn scene_lighting() -> Lighting {
    Lighting {
        ambient: srgb_to_linear(hex_rgb(AMBIENT_COLOR)),
        light_position: SUN_POSITION,
        light_color: Vec3::ONE,
        light_intensity: SUN_INTENSITY,
        light_range: SUN_RANGE,
    }
}

fn linear(srgb: Vec3, alpha: f32) -> [f32; 4] {
    srgb_to_linear(srgb).extend(alpha).into()
}

/// Meshes and uploaded textures for everything in a `Scene`. Built once; the scene
/// only changes transforms afterwards.
pub struct GpuScene {
    sphere: Mesh,
    dome: Mesh,
    hull: Mesh,
    rock: Mesh,
    panel: Mesh,
    /// Ring meshes keyed by (body, decoration) index.
    rings: HashMap<(usize, usize), Mesh>,
    body_textures: Vec<TextureId>,
    decoration_textures: HashMap<(usize, usize), TextureId>,
    craft: Vec<CraftPart>,
    stars: Vec<StarInstance>,
    lines: Vec<LineVertex>,
}

impl GpuScene {
    /// Upload every body texture. When `dump_dir` is set each texture is also
    /// written there as PNG.
    pub fn new(renderer: &mut Renderer, scene: &Scene, dump_dir: Option<&Path>) -> Self {
        let device = renderer.device();
        let sphere = renderer::sphere(1.0, 48, 32).upload(device, "Sphere");
        let dome = MeshData::sphere(1.0, 32, 16, PI / 2.0).upload(device, "Dome");
        let (top, bottom, height) = HULL_SHAPE;
        let hull = MeshData::cylinder(top, bottom, height, 32).upload(device, "Hull");
        let rock = MeshData::rock(DEBRIS_RADIUS, 1).upload(device, "Debris Rock");
        let panel = MeshData::plane(NEBULA_PANEL_SIZE).upload(device, "Nebula Panel");

        let mut rings = HashMap::new();
        let mut body_textures = Vec::with_capacity(scene.bodies.len());
        let mut decoration_textures = HashMap::new();

        if let Some(dir) = dump_dir {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!("Could not create texture dump dir {:?}: {}", dir, e);
            }
        }

        for (b, body) in scene.bodies.iter().enumerate() {
            let texture = match &body.material {
                Material::Textured { texture, surface, .. } => {
                    let label = format!("{}-{}", body.name, surface.label());
                    upload(renderer, texture, &label, dump_dir)
                }
                Material::Flat { .. } => TextureId::WHITE,
            };
            body_textures.push(texture);

            for (d, decoration) in body.decorations.iter().enumerate() {
                if let Decoration::Ring { inner, outer, .. } = decoration {
                    let mesh = MeshData::ring(*inner, *outer, 64)
                        .upload(renderer.device(), &format!("{} Ring {}", body.name, d));
                    rings.insert((b, d), mesh);
                }
                if let Some(texture) = decoration.texture() {
                    let label = format!("{}-decoration-{}", body.name, d);
                    decoration_textures.insert((b, d), upload(renderer, texture, &label, dump_dir));
                }
            }
        }
        log::info!(
            "GPU scene ready: {} textures, {} ring meshes",
            renderer.texture_count() - 1,
            rings.len()
        );

        Self {
            sphere,
            dome,
            hull,
            rock,
            panel,
            rings,
            body_textures,
            decoration_textures,
            craft: craft_parts(),
            stars: Vec::with_capacity(scene.ambient.star_count()),
            lines: Vec::new(),
        }
    }

    fn part_mesh(&self, mesh: PartMesh) -> &Mesh {
        match mesh {
            PartMesh::Hull => &self.hull,
            PartMesh::Dome => &self.dome,
            PartMesh::Sphere => &self.sphere,
        }
    }

    /// Submit one frame: opaque geometry, stars, then everything blended.
    pub fn draw(&mut self, renderer: &mut Renderer, scene: &Scene, camera: &mut Camera) -> Result<(), RenderError> {
        let pose = scene.director.current();
        camera.look(pose.position, pose.look_at);
        renderer.update_camera(camera);

        let mut frame = renderer.begin_frame()?;

        // Bodies, one draw each since each has its own texture.
        for (b, body) in scene.bodies.iter().enumerate() {
            let model = body.transform().to_matrix();
            let instance = match &body.material {
                Material::Textured { .. } => InstanceData::new(model, [1.0; 4]),
                Material::Flat {
                    albedo,
                    emissive,
                    emissive_intensity,
                    ..
                } => InstanceData::new(model, linear(*albedo, 1.0))
                    .with_emissive(srgb_to_linear(*emissive) * *emissive_intensity),
            }
            .with_roughness(body.material.roughness());
            let texture = self.body_textures.get(b).copied().unwrap_or(TextureId::WHITE);
            renderer.draw_meshes(&mut frame, &self.sphere, MeshPass::Opaque, texture, &[instance]);
        }

        let craft = scene.craft.as_ref().map(craft_matrix);
        if let Some(matrix) = craft {
            for part in self.craft.iter().filter(|p| !p.is_translucent()) {
                let mesh = self.part_mesh(part.mesh);
                renderer.draw_meshes(&mut frame, mesh, MeshPass::Opaque, TextureId::WHITE, &[part.instance(matrix)]);
            }
        }

        if let Some(debris) = &scene.ambient.debris {
            let group = debris.group_matrix();
            let color = linear(hex_rgb(DEBRIS_COLOR), 1.0);
            let instances: Vec<InstanceData> = debris
                .instances
                .iter()
                .map(|t| InstanceData::new(t.under(group), color))
                .collect();
            renderer.draw_meshes(&mut frame, &self.rock, MeshPass::Opaque, TextureId::WHITE, &instances);
        }

        let heads: Vec<InstanceData> = scene.comets.iter().map(comet_head_instance).collect();
        renderer.draw_meshes(&mut frame, &self.sphere, MeshPass::Opaque, TextureId::WHITE, &heads);

        self.stars.clear();
        for tier in &scene.ambient.star_tiers {
            let matrix = tier.matrix();
            self.stars.extend(tier.points.iter().map(|p| StarInstance {
                position: matrix.transform_point3(p.position).into(),
                size: tier.size,
                color: linear(p.color, STAR_OPACITY),
            }));
        }
        renderer.draw_stars(&mut frame, &self.stars);

        let panels: Vec<InstanceData> = scene
            .ambient
            .nebulae
            .iter()
            .map(|n| {
                let model = Mat4::from_translation(n.position)
                    * Mat4::from_rotation_z(n.roll)
                    * Mat4::from_scale(Vec3::splat(n.size / NEBULA_PANEL_SIZE));
                InstanceData::new(model, linear(hex_rgb(n.color), n.opacity)).unlit()
            })
            .collect();
        renderer.draw_meshes(&mut frame, &self.panel, MeshPass::Translucent, TextureId::WHITE, &panels);

        for (b, body) in scene.bodies.iter().enumerate() {
            for (d, decoration) in body.decorations.iter().enumerate() {
                let model = body.decoration_matrix(decoration);
                let texture = self.decoration_textures.get(&(b, d)).copied().unwrap_or(TextureId::WHITE);
                match decoration {
                    Decoration::Glow { color, opacity, .. } => {
                        let instance = InstanceData::new(model, linear(*color, *opacity)).unlit();
                        renderer.draw_meshes(&mut frame, &self.sphere, MeshPass::BackFace, texture, &[instance]);
                    }
                    Decoration::Ring { color, opacity, .. } => {
                        if let Some(mesh) = self.rings.get(&(b, d)) {
                            let instance = InstanceData::new(model, linear(*color, *opacity));
                            renderer.draw_meshes(&mut frame, mesh, MeshPass::Translucent, texture, &[instance]);
                        }
                    }
                    Decoration::Detail { opacity, .. } => {
                        let instance = InstanceData::new(model, [1.0, 1.0, 1.0, *opacity]);
                        renderer.draw_meshes(&mut frame, &self.sphere, MeshPass::Translucent, texture, &[instance]);
                    }
                    Decoration::Clouds { opacity, .. } => {
                        let instance = InstanceData::new(model, [1.0, 1.0, 1.0, *opacity]);
                        renderer.draw_meshes(&mut frame, &self.sphere, MeshPass::Additive, texture, &[instance]);
                    }
                }
            }
        }

        if let Some(matrix) = craft {
            for part in self.craft.iter().filter(|p| p.is_translucent()) {
                let mesh = self.part_mesh(part.mesh);
                renderer.draw_meshes(
                    &mut frame,
                    mesh,
                    MeshPass::Translucent,
                    TextureId::WHITE,
                    &[part.instance(matrix)],
                );
            }
        }

        self.lines.clear();
        for comet in &scene.comets {
            comet_trail_segments(comet, &mut self.lines);
        }
        renderer.draw_lines(&mut frame, &self.lines);

        renderer.end_frame(frame);
        Ok(())
    }

    /// Release mesh buffers. Textures belong to the renderer.
    pub fn destroy(&self) {
        for mesh in [&self.sphere, &self.dome, &self.hull, &self.rock, &self.panel] {
            mesh.destroy();
        }
        for mesh in self.rings.values() {
            mesh.destroy();
        }
    }
}

fn upload(renderer: &mut Renderer, texture: &TextureData, label: &str, dump_dir: Option<&Path>) -> TextureId {
    let bytes = texture.to_bytes();
    if let Some(dir) = dump_dir {
        let path = dir.join(format!("{label}.png"));
        match save_rgba_png(&path, texture.width, texture.height, bytes.clone()) {
            Ok(()) => log::info!("Wrote {:?}", path),
            Err(e) => log::warn!("Could not write {:?}: {}", path, e),
        }
    }
    renderer.upload_texture(texture.width, texture.height, &bytes, label)
}
