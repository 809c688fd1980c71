//! Mesh buffer building
//!
//! [`HexMesh`] accumulates triangles and quads for one surface (terrain,
//! rivers, roads, ...) of one chunk, then [`HexMesh::apply`] finalizes it into
//! engine-agnostic [`MeshData`].
//!
//! The face normal of a triangle `(v1, v2, v3)` is `(v2 - v1) × (v3 - v1)`;
//! upward surfaces come out with +Y normals. Quads take their corners as
//! (inner-left, inner-right, outer-left, outer-right) and split into the
//! triangles `(1, 3, 2)` and `(2, 3, 4)`.

mod pool;

pub use pool::{BufferPool, ListPool, Pooled};

use glam::{Vec2, Vec3, Vec4};

use crate::metrics::HexMetrics;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// `colors`, `uvs` and `uv2s` are either empty or one entry per vertex,
/// depending on the surface's [`MeshLayout`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, averaged from adjacent faces
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// First UV channel
    pub uvs: Vec<[f32; 2]>,
    /// Second UV channel
    pub uv2s: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Which optional vertex channels a surface carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshLayout {
    pub colors: bool,
    pub uvs: bool,
    pub uv2s: bool,
}

impl MeshLayout {
    pub const TERRAIN: Self = Self {
        colors: true,
        uvs: false,
        uv2s: false,
    };
    pub const RIVERS: Self = Self {
        colors: false,
        uvs: true,
        uv2s: false,
    };
    pub const ROADS: Self = Self::RIVERS;
    pub const WATER: Self = Self {
        colors: false,
        uvs: false,
        uv2s: false,
    };
    pub const WATER_SHORE: Self = Self::RIVERS;
    pub const ESTUARIES: Self = Self {
        colors: false,
        uvs: true,
        uv2s: true,
    };
}

/// Hand a buffer back unless it never allocated
fn recycle<T: Pooled>(pool: &BufferPool, list: &mut Vec<T>) {
    let list = std::mem::take(list);
    if list.capacity() > 0 {
        pool.add(list);
    }
}

/// Mesh under construction for one surface
///
/// Buffers are borrowed from a [`BufferPool`] by [`clear`](Self::clear) and
/// returned by [`apply`](Self::apply). Adding geometry to a mesh that was not
/// cleared first is allowed; it simply allocates fresh buffers.
#[derive(Debug, Default)]
pub struct HexMesh {
    layout: MeshLayout,
    vertices: Vec<Vec3>,
    colors: Vec<Vec4>,
    uvs: Vec<Vec2>,
    uv2s: Vec<Vec2>,
    triangles: Vec<u32>,
}

impl HexMesh {
    pub fn new(layout: MeshLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    #[inline]
    pub fn layout(&self) -> MeshLayout {
        self.layout
    }

    /// Start a new generation, acquiring empty buffers from the pool
    ///
    /// Any geometry left over from an unapplied pass is discarded.
    pub fn clear(&mut self, pool: &BufferPool) {
        self.release(pool);
        self.vertices = pool.get();
        self.triangles = pool.get();
        if self.layout.colors {
            self.colors = pool.get();
        }
        if self.layout.uvs {
            self.uvs = pool.get();
        }
        if self.layout.uv2s {
            self.uv2s = pool.get();
        }
    }

    /// Finalize into [`MeshData`] and hand the working buffers back to the pool
    pub fn apply(&mut self, pool: &BufferPool) -> MeshData {
        let data = MeshData {
            positions: self.vertices.iter().map(|v| v.to_array()).collect(),
            normals: self.recalculate_normals(),
            colors: self.colors.iter().map(|c| c.to_array()).collect(),
            uvs: self.uvs.iter().map(|uv| uv.to_array()).collect(),
            uv2s: self.uv2s.iter().map(|uv| uv.to_array()).collect(),
            indices: self.triangles.clone(),
        };
        self.release(pool);
        data
    }

    fn release(&mut self, pool: &BufferPool) {
        recycle(pool, &mut self.vertices);
        recycle(pool, &mut self.triangles);
        recycle(pool, &mut self.colors);
        recycle(pool, &mut self.uvs);
        recycle(pool, &mut self.uv2s);
    }

    /// Area-weighted vertex normals; isolated or degenerate vertices point up
    fn recalculate_normals(&self) -> Vec<[f32; 3]> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
            .collect()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    #[inline]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    #[inline]
    pub fn uv2s(&self) -> &[Vec2] {
        &self.uv2s
    }

    #[inline]
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Add a triangle, perturbing every vertex
    pub fn add_triangle(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3) {
        self.add_triangle_unperturbed(metrics.perturb(v1), metrics.perturb(v2), metrics.perturb(v3));
    }

    /// Add a triangle whose vertices are already final
    pub fn add_triangle_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3) {
        let index = self.vertices.len() as u32;
        self.vertices.extend([v1, v2, v3]);
        self.triangles.extend([index, index + 1, index + 2]);
    }

    /// Add a quad, perturbing every vertex
    pub fn add_quad(&mut self, metrics: &HexMetrics, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        self.add_quad_unperturbed(
            metrics.perturb(v1),
            metrics.perturb(v2),
            metrics.perturb(v3),
            metrics.perturb(v4),
        );
    }

    /// Add a quad whose vertices are already final
    pub fn add_quad_unperturbed(&mut self, v1: Vec3, v2: Vec3, v3: Vec3, v4: Vec3) {
        let index = self.vertices.len() as u32;
        self.vertices.extend([v1, v2, v3, v4]);
        self.triangles
            .extend([index, index + 2, index + 1, index + 1, index + 2, index + 3]);
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    pub fn add_triangle_color(&mut self, color: Vec4) {
        self.colors.extend([color; 3]);
    }

    pub fn add_triangle_colors(&mut self, c1: Vec4, c2: Vec4, c3: Vec4) {
        self.colors.extend([c1, c2, c3]);
    }

    pub fn add_quad_color(&mut self, color: Vec4) {
        self.colors.extend([color; 4]);
    }

    /// Inner edge gets `c1`, outer edge gets `c2`
    pub fn add_quad_color_pair(&mut self, c1: Vec4, c2: Vec4) {
        self.colors.extend([c1, c1, c2, c2]);
    }

    pub fn add_quad_colors(&mut self, c1: Vec4, c2: Vec4, c3: Vec4, c4: Vec4) {
        self.colors.extend([c1, c2, c3, c4]);
    }

    // ------------------------------------------------------------------
    // UVs
    // ------------------------------------------------------------------

    pub fn add_triangle_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uvs.extend([uv1, uv2, uv3]);
    }

    pub fn add_triangle_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2) {
        self.uv2s.extend([uv1, uv2, uv3]);
    }

    pub fn add_quad_uv(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uvs.extend([uv1, uv2, uv3, uv4]);
    }

    /// UVs spanning a rectangle: (u_min, v_min), (u_max, v_min), (u_min, v_max), (u_max, v_max)
    pub fn add_quad_uv_rect(&mut self, u_min: f32, u_max: f32, v_min: f32, v_max: f32) {
        self.uvs.extend([
            Vec2::new(u_min, v_min),
            Vec2::new(u_max, v_min),
            Vec2::new(u_min, v_max),
            Vec2::new(u_max, v_max),
        ]);
    }

    pub fn add_quad_uv2(&mut self, uv1: Vec2, uv2: Vec2, uv3: Vec2, uv4: Vec2) {
        self.uv2s.extend([uv1, uv2, uv3, uv4]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexMapConfigBuilder;

    fn flat_metrics() -> HexMetrics {
        let config = HexMapConfigBuilder::new()
            .seed(1)
            .perturbation(0.0, 0.0)
            .unwrap()
            .build()
            .unwrap();
        HexMetrics::new(config)
    }

    #[test]
    fn test_triangle_indices() {
        let pool = BufferPool::new();
        let mut mesh = HexMesh::new(MeshLayout::TERRAIN);
        mesh.clear(&pool);
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::Z, Vec3::X);
        mesh.add_triangle_color(Vec4::ONE);
        assert_eq!(mesh.triangles(), &[0, 1, 2]);
        assert_eq!(mesh.colors().len(), 3);
    }

    #[test]
    fn test_quad_index_order() {
        let pool = BufferPool::new();
        let mut mesh = HexMesh::new(MeshLayout::RIVERS);
        mesh.clear(&pool);
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::Z, Vec3::X);
        mesh.add_quad_unperturbed(Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(&mesh.triangles()[3..], &[3, 5, 4, 4, 5, 6]);
    }

    #[test]
    fn test_quad_uv_rect() {
        let pool = BufferPool::new();
        let mut mesh = HexMesh::new(MeshLayout::RIVERS);
        mesh.clear(&pool);
        mesh.add_quad_uv_rect(0.0, 1.0, 0.2, 0.4);
        assert_eq!(
            mesh.uvs(),
            &[
                Vec2::new(0.0, 0.2),
                Vec2::new(1.0, 0.2),
                Vec2::new(0.0, 0.4),
                Vec2::new(1.0, 0.4)
            ]
        );
    }

    #[test]
    fn test_up_facing_normals() {
        let pool = BufferPool::new();
        let mut mesh = HexMesh::new(MeshLayout::WATER);
        mesh.clear(&pool);
        mesh.add_quad_unperturbed(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
        );
        let data = mesh.apply(&pool);
        assert_eq!(data.vertex_count(), 4);
        assert_eq!(data.triangle_count(), 2);
        for n in &data.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_perturbed_add_uses_metrics() {
        let metrics = flat_metrics();
        let mut mesh = HexMesh::new(MeshLayout::TERRAIN);
        let v = Vec3::new(3.0, 1.0, 2.0);
        mesh.add_triangle(&metrics, v, v, v);
        assert_eq!(mesh.vertices(), &[v, v, v]);
    }

    #[test]
    fn test_apply_returns_buffers_to_pool() {
        let pool = BufferPool::new();
        let mut mesh = HexMesh::new(MeshLayout::ESTUARIES);
        mesh.clear(&pool);
        mesh.add_triangle_unperturbed(Vec3::ZERO, Vec3::Z, Vec3::X);
        mesh.add_triangle_uv(Vec2::ZERO, Vec2::ONE, Vec2::X);
        mesh.add_triangle_uv2(Vec2::ZERO, Vec2::ONE, Vec2::Y);
        let data = mesh.apply(&pool);

        assert_eq!(data.uvs.len(), 3);
        assert_eq!(data.uv2s.len(), 3);
        assert!(data.colors.is_empty());
        // vertices, triangles, uvs, uv2s
        assert_eq!(pool.idle_count(), 4);
        assert_eq!(mesh.vertex_count(), 0);

        mesh.clear(&pool);
        assert_eq!(pool.idle_count(), 0);
    }
}
