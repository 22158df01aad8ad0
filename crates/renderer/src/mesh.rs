//! Mesh data structures and primitive generation.
//!
//! Primitives are built as `MeshData` on the CPU and uploaded once at startup.

use crate::vertex::Vertex;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// Mesh data before GPU upload (for procedural generation).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> Mesh {
        Mesh::new(device, label, &self.vertices, &self.indices)
    }

    /// UV sphere. `phi_length` limits the sweep from the north pole, so `PI / 2`
    /// gives the upper hemisphere.
    pub fn sphere(radius: f32, segments: u32, rings: u32, phi_length: f32) -> Self {
        let mut data = Self::new();
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let phi = phi_length * v;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();

            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let theta = TAU * u;
                let x = -ring_radius * theta.cos();
                let z = ring_radius * theta.sin();
                let normal = Vec3::new(x, y, z).normalize_or_zero();
                data.vertices.push(Vertex::new([x, y, z], normal.into(), [u, v]));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;
                data.indices.extend_from_slice(&[current, next, current + 1]);
                data.indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }
        data
    }

    /// Flat annulus in the XY plane, facing +Z.
    pub fn ring(inner: f32, outer: f32, segments: u32) -> Self {
        let mut data = Self::new();
        for segment in 0..=segments {
            let theta = TAU * segment as f32 / segments as f32;
            let dir = Vec2::new(theta.cos(), theta.sin());
            for (radius, v) in [(inner, 0.0), (outer, 1.0)] {
                let p = dir * radius;
                data.vertices.push(Vertex::new(
                    [p.x, p.y, 0.0],
                    [0.0, 0.0, 1.0],
                    [segment as f32 / segments as f32, v],
                ));
            }
        }
        for segment in 0..segments {
            let i = segment * 2;
            data.indices.extend_from_slice(&[i, i + 1, i + 3, i, i + 3, i + 2]);
        }
        data
    }

    /// Square in the XY plane, facing +Z, centred at the origin.
    pub fn plane(size: f32) -> Self {
        let half = size / 2.0;
        Self {
            vertices: vec![
                Vertex::new([-half, -half, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
                Vertex::new([half, -half, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
                Vertex::new([half, half, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex::new([-half, half, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Capped cylinder along Y (a cone frustum when the radii differ).
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let mut data = Self::new();
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;

        for (y, radius, v) in [(half, radius_top, 0.0), (-half, radius_bottom, 1.0)] {
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let theta = TAU * u;
                let (sin, cos) = theta.sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize_or_zero();
                data.vertices
                    .push(Vertex::new([radius * sin, y, radius * cos], normal.into(), [u, v]));
            }
        }
        for segment in 0..segments {
            let top = segment;
            let bottom = segment + segments + 1;
            data.indices.extend_from_slice(&[top, bottom, top + 1, bottom, bottom + 1, top + 1]);
        }

        for (y, radius, up) in [(half, radius_top, 1.0f32), (-half, radius_bottom, -1.0)] {
            let center = data.vertices.len() as u32;
            data.vertices.push(Vertex::new([0.0, y, 0.0], [0.0, up, 0.0], [0.5, 0.5]));
            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let (sin, cos) = theta.sin_cos();
                data.vertices.push(Vertex::new(
                    [radius * sin, y, radius * cos],
                    [0.0, up, 0.0],
                    [0.5 + 0.5 * sin, 0.5 + 0.5 * cos],
                ));
            }
            for segment in 0..segments {
                let a = center + 1 + segment;
                if up > 0.0 {
                    data.indices.extend_from_slice(&[center, a, a + 1]);
                } else {
                    data.indices.extend_from_slice(&[center, a + 1, a]);
                }
            }
        }
        data
    }

    /// Faceted rock: a tetrahedron with each face split `detail` times and pushed
    /// out to the sphere. Flat shaded.
    pub fn rock(radius: f32, detail: u32) -> Self {
        let corners = [
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
        ];
        let faces = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
        let n = detail + 1;

        let mut data = Self::new();
        for face in faces {
            let [a, b, c] = face.map(|i: usize| corners[i]);
            // Barycentric grid over the face, projected to the sphere.
            let point = |i: u32, j: u32| -> Vec3 {
                let p = a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
                p.normalize() * radius
            };
            for i in 0..n {
                for j in 0..(n - i) {
                    data.push_flat_triangle(point(i, j), point(i + 1, j), point(i, j + 1));
                    if i + j + 1 < n {
                        data.push_flat_triangle(point(i + 1, j), point(i + 1, j + 1), point(i, j + 1));
                    }
                }
            }
        }
        data
    }

    fn push_flat_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let mut normal = (b - a).cross(c - a).normalize_or_zero();
        // Keep winding and normal pointing away from the centre.
        let (b, c) = if normal.dot(a + b + c) < 0.0 {
            normal = -normal;
            (c, b)
        } else {
            (b, c)
        };
        let base = self.vertices.len() as u32;
        for (p, uv) in [(a, [0.0, 0.0]), (b, [1.0, 0.0]), (c, [0.5, 1.0])] {
            self.vertices.push(Vertex::new(p.into(), normal.into(), uv));
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Full sphere shorthand.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    MeshData::sphere(radius, segments, rings, PI)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_index_in_range(data: &MeshData) -> bool {
        data.indices.iter().all(|&i| (i as usize) < data.vertices.len())
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let data = sphere(2.0, 16, 8);
        assert_eq!(data.vertices.len(), 17 * 9);
        assert_eq!(data.indices.len(), 16 * 8 * 6);
        assert!(max_index_in_range(&data));
        for v in &data.vertices {
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn half_sphere_stays_above_equator() {
        let data = MeshData::sphere(1.0, 16, 8, PI / 2.0);
        assert!(data.vertices.iter().all(|v| v.position[1] >= -1e-5));
    }

    #[test]
    fn ring_spans_inner_to_outer() {
        let data = MeshData::ring(1.5, 2.5, 32);
        assert!(max_index_in_range(&data));
        for v in &data.vertices {
            let r = Vec2::new(v.position[0], v.position[1]).length();
            assert!((r - 1.5).abs() < 1e-4 || (r - 2.5).abs() < 1e-4);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn cylinder_radii_and_height() {
        let data = MeshData::cylinder(3.0, 5.0, 1.0, 32);
        assert!(max_index_in_range(&data));
        let max_r = data
            .vertices
            .iter()
            .map(|v| Vec2::new(v.position[0], v.position[2]).length())
            .fold(0.0, f32::max);
        assert!((max_r - 5.0).abs() < 1e-4);
        assert!(data.vertices.iter().all(|v| v.position[1].abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn rock_is_closed_and_outward_facing() {
        let data = MeshData::rock(0.5, 1);
        // 4 faces, each split into (detail + 1)^2 triangles.
        assert_eq!(data.indices.len(), 4 * 4 * 3);
        for tri in data.indices.chunks(3) {
            let v = data.vertices[tri[0] as usize];
            let centroid: Vec3 = tri.iter().map(|&i| Vec3::from(data.vertices[i as usize].position)).sum();
            assert!(Vec3::from(v.normal).dot(centroid) > 0.0);
        }
    }
}
