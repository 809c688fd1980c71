//! Cell triangulation
//!
//! [`Triangulator`] walks the cells of one chunk and writes six surfaces into a
//! [`ChunkMeshes`]. Each cell is processed direction by direction (NE → NW):
//!
//! 1. the solid inner part of the hexagon (plain fan, river channel, or the
//!    fill beside a river)
//! 2. the bridge toward the neighbour, for NE, E and SE only
//! 3. the three-cell corner, for NE and E only
//! 4. the water surface, when the cell is underwater
//!
//! Every vertex shared by two cells is computed from the same unperturbed
//! position by both sides, and [`HexMetrics::perturb`] is pure, so the surfaces
//! are seamless.

mod river;
mod road;
mod terrain;
mod water;

use glam::Vec3;

use crate::cell::{CellGraph, HexCell};
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::features::{FeatureInstance, FeatureManager};
use crate::mesh::{BufferPool, HexMesh, MeshData, MeshLayout};
use crate::metrics::HexMetrics;

/// Working meshes for one chunk
#[derive(Debug)]
pub struct ChunkMeshes {
    pub terrain: HexMesh,
    pub rivers: HexMesh,
    pub roads: HexMesh,
    pub water: HexMesh,
    pub water_shore: HexMesh,
    pub estuaries: HexMesh,
    pub features: FeatureManager,
}

impl Default for ChunkMeshes {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkMeshes {
    pub fn new() -> Self {
        Self {
            terrain: HexMesh::new(MeshLayout::TERRAIN),
            rivers: HexMesh::new(MeshLayout::RIVERS),
            roads: HexMesh::new(MeshLayout::ROADS),
            water: HexMesh::new(MeshLayout::WATER),
            water_shore: HexMesh::new(MeshLayout::WATER_SHORE),
            estuaries: HexMesh::new(MeshLayout::ESTUARIES),
            features: FeatureManager::new(),
        }
    }

    /// Begin a pass, taking fresh buffers from the pool
    pub fn clear(&mut self, pool: &BufferPool) {
        self.terrain.clear(pool);
        self.rivers.clear(pool);
        self.roads.clear(pool);
        self.water.clear(pool);
        self.water_shore.clear(pool);
        self.estuaries.clear(pool);
        self.features.clear();
    }

    /// Finish a pass, returning buffers to the pool
    pub fn apply(&mut self, pool: &BufferPool) -> ChunkMeshData {
        ChunkMeshData {
            terrain: self.terrain.apply(pool),
            rivers: self.rivers.apply(pool),
            roads: self.roads.apply(pool),
            water: self.water.apply(pool),
            water_shore: self.water_shore.apply(pool),
            estuaries: self.estuaries.apply(pool),
            features: self.features.apply(),
        }
    }
}

/// Finished geometry of one chunk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMeshData {
    pub terrain: MeshData,
    pub rivers: MeshData,
    pub roads: MeshData,
    pub water: MeshData,
    pub water_shore: MeshData,
    pub estuaries: MeshData,
    pub features: Vec<FeatureInstance>,
}

impl ChunkMeshData {
    /// All surfaces, in a fixed order
    pub fn surfaces(&self) -> [(&'static str, &MeshData); 6] {
        [
            ("terrain", &self.terrain),
            ("rivers", &self.rivers),
            ("roads", &self.roads),
            ("water", &self.water),
            ("water_shore", &self.water_shore),
            ("estuaries", &self.estuaries),
        ]
    }

    pub fn vertex_count(&self) -> usize {
        self.surfaces().iter().map(|(_, m)| m.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.surfaces().iter().map(|(_, m)| m.triangle_count()).sum()
    }
}

/// Builds chunk geometry from read-only cells
///
/// Borrowing the graph and metrics immutably while holding the meshes
/// mutably keeps a pass free of shared mutable state; several triangulators
/// can run at once over the same grid.
pub struct Triangulator<'a, G: CellGraph + ?Sized> {
    graph: &'a G,
    metrics: &'a HexMetrics,
    meshes: &'a mut ChunkMeshes,
}

impl<'a, G: CellGraph + ?Sized> Triangulator<'a, G> {
    pub fn new(graph: &'a G, metrics: &'a HexMetrics, meshes: &'a mut ChunkMeshes) -> Self {
        Self {
            graph,
            metrics,
            meshes,
        }
    }

    /// Triangulate the given cells; unknown ids are skipped
    pub fn triangulate(&mut self, cell_ids: &[usize]) {
        let graph = self.graph;
        for &id in cell_ids {
            if let Some(cell) = graph.cell(id) {
                self.triangulate_cell(cell);
            }
        }
    }

    pub fn triangulate_cell(&mut self, cell: &'a HexCell) {
        for direction in HexDirection::ALL {
            self.triangulate_direction(direction, cell);
        }
        if !cell.is_underwater() && !cell.has_river() && !cell.has_roads() {
            self.meshes.features.add_feature(self.metrics, cell, cell.position);
        }
    }

    #[inline]
    fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&'a HexCell> {
        let graph: &'a G = self.graph;
        graph.neighbor(cell, direction)
    }

    fn triangulate_direction(&mut self, direction: HexDirection, cell: &'a HexCell) {
        let m = self.metrics;
        let center = cell.position;
        let mut e = EdgeVertices::new(
            center + m.first_solid_corner(direction),
            center + m.second_solid_corner(direction),
        );

        if cell.has_river() {
            if cell.has_river_through_edge(direction) {
                e.v3.y = m.stream_bed_y(cell.elevation);
                if cell.has_river_begin_or_end() {
                    self.triangulate_with_river_begin_or_end(cell, center, e);
                } else {
                    self.triangulate_with_river(direction, cell, center, e);
                }
            } else {
                self.triangulate_adjacent_to_river(direction, cell, center, e);
            }
        } else {
            self.triangulate_without_river(direction, cell, center, e);
            if !cell.is_underwater() && !cell.has_road_through_edge(direction) {
                self.add_edge_feature(cell, center, &e);
            }
        }

        if direction <= HexDirection::SE {
            self.triangulate_connection(direction, cell, e);
        }

        if cell.is_underwater() {
            self.triangulate_water(direction, cell, center);
        }
    }

    fn triangulate_without_river(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        center: Vec3,
        e: EdgeVertices,
    ) {
        self.triangulate_edge_fan(center, e, cell.color);

        if cell.has_roads() {
            let interpolators = road::road_interpolators(direction, cell);
            self.triangulate_road(
                center,
                center.lerp(e.v1, interpolators.x),
                center.lerp(e.v5, interpolators.y),
                e,
                cell.has_road_through_edge(direction),
            );
        }
    }

    /// Feature at the centroid of the wedge between the center and the edge
    fn add_edge_feature(&mut self, cell: &HexCell, center: Vec3, e: &EdgeVertices) {
        let position = (center + e.v1 + e.v5) * (1.0 / 3.0);
        self.meshes.features.add_feature(self.metrics, cell, position);
    }
}
