//! Plume mesh: a subdivided vertical plane.
//!
//! The plane lies in XY facing +Z, is shifted so its bottom edge sits at
//! y = 0, then stretched into a tall thin rectangle. UVs always cover
//! `[0, 1]²` with v running from the base (0) to the top (1), whatever the
//! scale, because the shading keys every noise lookup on them.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Vertex layout shared by the CPU mesh and the smoke vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PlumeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PlumeVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlumeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }
}

/// Grid geometry for the smoke plume.
#[derive(Debug, Clone)]
pub struct PlumeMesh {
    pub vertices: Vec<PlumeVertex>,
    pub indices: Vec<u32>,
    width_segments: u32,
    height_segments: u32,
}

impl PlumeMesh {
    /// A unit plane centered on the origin, split into
    /// `width_segments × height_segments` cells.
    pub fn plane(width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(1);
        let height_segments = height_segments.max(1);
        let columns = width_segments + 1;

        let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
        for row in 0..=height_segments {
            let v = row as f32 / height_segments as f32;
            for col in 0..=width_segments {
                let u = col as f32 / width_segments as f32;
                vertices.push(PlumeVertex {
                    position: [u - 0.5, v - 0.5, 0.0],
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for row in 0..height_segments {
            for col in 0..width_segments {
                let a = row * columns + col;
                let b = a + 1;
                let c = a + columns;
                let d = c + 1;
                // Counter-clockwise seen from +Z
                indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }

        Self {
            vertices,
            indices,
            width_segments,
            height_segments,
        }
    }

    /// The coffee cup plume: 16 × 64 cells, base at y = 0, 1.5 wide, 6 tall.
    pub fn coffee_plume() -> Self {
        Self::plane(16, 64)
            .translated(Vec3::new(0.0, 0.5, 0.0))
            .scaled(Vec3::new(1.5, 6.0, 1.5))
    }

    pub fn translated(self, offset: Vec3) -> Self {
        self.transformed(Mat4::from_translation(offset))
    }

    pub fn scaled(self, scale: Vec3) -> Self {
        self.transformed(Mat4::from_scale(scale))
    }

    /// Apply a transform to every position; UVs are left alone.
    pub fn transformed(mut self, matrix: Mat4) -> Self {
        for vertex in &mut self.vertices {
            vertex.position = matrix.transform_point3(vertex.position()).to_array();
        }
        self
    }

    pub fn width_segments(&self) -> u32 {
        self.width_segments
    }

    pub fn height_segments(&self) -> u32 {
        self.height_segments
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Axis-aligned bounds of the current positions.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.position()), hi.max(v.position())),
        )
    }
}
