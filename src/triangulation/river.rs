//! River channels, river surfaces and waterfalls
//!
//! The channel is carved into the terrain by lowering the middle vertex of an
//! edge to the stream bed. The water surface is a separate mesh floating at
//! the river surface height, with V running along the flow direction.

use glam::{Vec2, Vec3};

use super::Triangulator;
use crate::cell::{CellGraph, HexCell};
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::INNER_TO_OUTER;

impl<'a, G: CellGraph + ?Sized> Triangulator<'a, G> {
    /// Solid part of a cell whose river flows through `direction` and leaves
    /// through another edge
    pub(super) fn triangulate_with_river(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        mut center: Vec3,
        e: EdgeVertices,
    ) {
        let m = self.metrics;

        // Split the center into two banks shaped by where the river goes next
        let (center_l, center_r) = if cell.has_river_through_edge(direction.opposite()) {
            (
                center + m.first_solid_corner(direction.previous()) * 0.25,
                center + m.second_solid_corner(direction.next()) * 0.25,
            )
        } else if cell.has_river_through_edge(direction.next()) {
            (center, center.lerp(e.v5, 2.0 / 3.0))
        } else if cell.has_river_through_edge(direction.previous()) {
            (center.lerp(e.v1, 2.0 / 3.0), center)
        } else if cell.has_river_through_edge(direction.next2()) {
            (
                center,
                center + m.solid_edge_middle(direction.next()) * (0.5 * INNER_TO_OUTER),
            )
        } else {
            (
                center + m.solid_edge_middle(direction.previous()) * (0.5 * INNER_TO_OUTER),
                center,
            )
        };
        center = center_l.lerp(center_r, 0.5);

        let mut mid = EdgeVertices::with_outer_step(
            center_l.lerp(e.v1, 0.5),
            center_r.lerp(e.v5, 0.5),
            1.0 / 6.0,
        );
        mid.v3.y = e.v3.y;
        center.y = e.v3.y;

        self.triangulate_edge_strip(mid, cell.color, e, cell.color, false);

        let terrain = &mut self.meshes.terrain;
        terrain.add_triangle(m, center_l, mid.v1, mid.v2);
        terrain.add_triangle_color(cell.color);
        terrain.add_quad(m, center_l, center, mid.v2, mid.v3);
        terrain.add_quad_color(cell.color);
        terrain.add_quad(m, center, center_r, mid.v3, mid.v4);
        terrain.add_quad_color(cell.color);
        terrain.add_triangle(m, center_r, mid.v4, mid.v5);
        terrain.add_triangle_color(cell.color);

        if !cell.is_underwater() {
            let reversed = cell.incoming_river == Some(direction);
            let surface = m.river_surface_y(cell.elevation);
            self.triangulate_river_quad(center_l, center_r, mid.v2, mid.v4, surface, surface, 0.4, reversed);
            self.triangulate_river_quad(mid.v2, mid.v4, e.v2, e.v4, surface, surface, 0.6, reversed);
        }
    }

    /// Solid part of a cell where a river starts or ends
    pub(super) fn triangulate_with_river_begin_or_end(
        &mut self,
        cell: &'a HexCell,
        mut center: Vec3,
        e: EdgeVertices,
    ) {
        let m = self.metrics;
        let mut mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        mid.v3.y = e.v3.y;

        self.triangulate_edge_strip(mid, cell.color, e, cell.color, false);
        self.triangulate_edge_fan(center, mid, cell.color);

        if cell.is_underwater() {
            return;
        }

        let reversed = cell.has_incoming_river();
        let surface = m.river_surface_y(cell.elevation);
        self.triangulate_river_quad(mid.v2, mid.v4, e.v2, e.v4, surface, surface, 0.6, reversed);

        center.y = surface;
        mid.v2.y = surface;
        mid.v4.y = surface;
        let rivers = &mut self.meshes.rivers;
        rivers.add_triangle(m, center, mid.v2, mid.v4);
        if reversed {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(1.0, 0.2), Vec2::new(0.0, 0.2));
        } else {
            rivers.add_triangle_uv(Vec2::new(0.5, 0.4), Vec2::new(0.0, 0.6), Vec2::new(1.0, 0.6));
        }
    }

    /// Solid part of a cell that has a river, for an edge the river does not
    /// cross
    pub(super) fn triangulate_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        mut center: Vec3,
        e: EdgeVertices,
    ) {
        let m = self.metrics;

        if cell.has_roads() {
            self.triangulate_road_adjacent_to_river(direction, cell, center, e);
        }

        // Pull the center away from the channel so the fill meets the banks
        if cell.has_river_through_edge(direction.next()) {
            if cell.has_river_through_edge(direction.previous()) {
                center += m.solid_edge_middle(direction) * (INNER_TO_OUTER * 0.5);
            } else if cell.has_river_through_edge(direction.previous2()) {
                center += m.first_solid_corner(direction) * 0.25;
            }
        } else if cell.has_river_through_edge(direction.previous())
            && cell.has_river_through_edge(direction.next2())
        {
            center += m.second_solid_corner(direction) * 0.25;
        }

        let mid = EdgeVertices::new(center.lerp(e.v1, 0.5), center.lerp(e.v5, 0.5));
        self.triangulate_edge_strip(mid, cell.color, e, cell.color, false);
        self.triangulate_edge_fan(center, mid, cell.color);

        if !cell.is_underwater() && !cell.has_road_through_edge(direction) {
            self.add_edge_feature(cell, center, &e);
        }
    }

    /// River surface across the bridge toward `neighbor`
    ///
    /// Between two dry cells this is a sloped river quad. Where exactly one
    /// side is underwater and the dry side sits above the water, the river
    /// falls into the lake as a waterfall clipped at the water surface.
    pub(super) fn triangulate_river_connection(
        &mut self,
        direction: HexDirection,
        cell: &HexCell,
        neighbor: &HexCell,
        e1: &EdgeVertices,
        e2: &EdgeVertices,
    ) {
        let m = self.metrics;
        let cell_surface = m.river_surface_y(cell.elevation);
        let neighbor_surface = m.river_surface_y(neighbor.elevation);

        if !cell.is_underwater() {
            if !neighbor.is_underwater() {
                self.triangulate_river_quad(
                    e1.v2,
                    e1.v4,
                    e2.v2,
                    e2.v4,
                    cell_surface,
                    neighbor_surface,
                    0.8,
                    cell.incoming_river == Some(direction),
                );
            } else if cell.elevation > neighbor.water_level {
                self.triangulate_waterfall_in_water(
                    e1.v2,
                    e1.v4,
                    e2.v2,
                    e2.v4,
                    cell_surface,
                    neighbor_surface,
                    m.water_surface_y(neighbor.water_level),
                );
            }
        } else if !neighbor.is_underwater() && neighbor.elevation > cell.water_level {
            self.triangulate_waterfall_in_water(
                e2.v4,
                e2.v2,
                e1.v4,
                e1.v2,
                neighbor_surface,
                cell_surface,
                m.water_surface_y(cell.water_level),
            );
        }
    }

    /// River surface quad from height `y1` (v1, v2) to `y2` (v3, v4)
    ///
    /// V starts at `v` and spans 0.2; reversed quads flip both U and V so the
    /// flow always points downstream.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_river_quad(
        &mut self,
        mut v1: Vec3,
        mut v2: Vec3,
        mut v3: Vec3,
        mut v4: Vec3,
        y1: f32,
        y2: f32,
        v: f32,
        reversed: bool,
    ) {
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        let rivers = &mut self.meshes.rivers;
        rivers.add_quad(self.metrics, v1, v2, v3, v4);
        if reversed {
            rivers.add_quad_uv_rect(1.0, 0.0, 0.8 - v, 0.6 - v);
        } else {
            rivers.add_quad_uv_rect(0.0, 1.0, v, v + 0.2);
        }
    }

    /// Waterfall from height `y1` down to `y2`, cut off at `water_y`
    #[allow(clippy::too_many_arguments)]
    fn triangulate_waterfall_in_water(
        &mut self,
        mut v1: Vec3,
        mut v2: Vec3,
        mut v3: Vec3,
        mut v4: Vec3,
        y1: f32,
        y2: f32,
        water_y: f32,
    ) {
        let m = self.metrics;
        v1.y = y1;
        v2.y = y1;
        v3.y = y2;
        v4.y = y2;
        let v1 = m.perturb(v1);
        let v2 = m.perturb(v2);
        let v3 = m.perturb(v3);
        let v4 = m.perturb(v4);

        debug_assert!(y1 != y2, "waterfall without a drop");
        let t = (water_y - y2) / (y1 - y2);
        let v3 = v3.lerp(v1, t);
        let v4 = v4.lerp(v2, t);

        let rivers = &mut self.meshes.rivers;
        rivers.add_quad_unperturbed(v1, v2, v3, v4);
        rivers.add_quad_uv_rect(0.0, 1.0, 0.8, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::direction::HexDirection;
    use crate::metrics::INNER_TO_OUTER;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    #[test]
    fn test_straight_river_carves_channel() {
        let mut grid = flat_grid();
        let ne = grid.cell(CENTER).unwrap().neighbor_id(HexDirection::NE).unwrap();
        grid.set_outgoing_river(ne, HexDirection::SW).unwrap();
        grid.set_outgoing_river(CENTER, HexDirection::SW).unwrap();

        let cell = grid.cell(CENTER).unwrap();
        assert_eq!(cell.incoming_river, Some(HexDirection::NE));
        assert_eq!(cell.outgoing_river, Some(HexDirection::SW));

        let meshes = triangulate_one(&grid, CENTER);
        let m = grid.metrics();
        let bed = m.stream_bed_y(cell.elevation);
        let vertices = meshes.terrain.vertices();

        // Channel centerline passes through the cell center at stream bed height
        let on_bed = |p: Vec3| {
            vertices
                .iter()
                .any(|v| (v.x - p.x).abs() < 1e-3 && (v.z - p.z).abs() < 1e-3 && (v.y - bed).abs() < 1e-4)
        };
        assert!(on_bed(cell.position));
        for d in [HexDirection::NE, HexDirection::SW] {
            assert!(on_bed(cell.position + m.solid_edge_middle(d)));
        }

        // No fan converges on the unlowered center
        assert!(!vertices.iter().any(|v| v.distance(cell.position) < 1e-3));

        // Two quads for each channel half, plus the NE bridge quad
        assert_eq!(meshes.rivers.triangle_count(), 4 + 4 + 2);
        assert_eq!(meshes.rivers.uvs().len(), meshes.rivers.vertex_count());
        let surface = m.river_surface_y(cell.elevation);
        for v in meshes.rivers.vertices() {
            assert_abs_diff_eq!(v.y, surface, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sharp_turn_shifts_channel_center() {
        let grid = river_grid(HexDirection::NE, HexDirection::E);
        let cell = grid.cell(CENTER).unwrap();
        let meshes = triangulate_one(&grid, CENTER);
        let m = grid.metrics();

        // both channel wedges agree on a center a third of the way to the
        // shared corner, at stream bed height
        let mut expected = cell.position + m.second_solid_corner(HexDirection::NE) * (1.0 / 3.0);
        expected.y = m.stream_bed_y(cell.elevation);
        assert!(has_vertex(&meshes.terrain, expected));
        assert!(!has_vertex(&meshes.terrain, Vec3::new(cell.position.x, expected.y, cell.position.z)));
    }

    #[test]
    fn test_gentle_turn_shifts_channel_center() {
        let grid = river_grid(HexDirection::NW, HexDirection::E);
        let cell = grid.cell(CENTER).unwrap();
        let meshes = triangulate_one(&grid, CENTER);
        let m = grid.metrics();

        // the center moves toward the NE edge, inside the bend
        let mut expected =
            cell.position + m.solid_edge_middle(HexDirection::NE) * (0.25 * INNER_TO_OUTER);
        expected.y = m.stream_bed_y(cell.elevation);
        assert!(has_vertex(&meshes.terrain, expected));
        // channel halves: 2 quads each on NW and E, plus the E bridge
        assert_eq!(meshes.rivers.triangle_count(), 4 + 4 + 2);
    }

    #[test]
    fn test_river_source_closes_with_triangle() {
        let mut grid = flat_grid();
        grid.set_outgoing_river(CENTER, HexDirection::E).unwrap();
        let meshes = triangulate_one(&grid, CENTER);

        // Outer quad plus closing triangle inside the cell, and the bridge quad
        // toward the E neighbour
        assert_eq!(meshes.rivers.triangle_count(), 2 + 1 + 2);
        let uvs = meshes.rivers.uvs();
        // source rivers are not reversed: V grows toward the edge
        assert_eq!(uvs[0].y, 0.6);
        assert_eq!(uvs[2].y, 0.8);
    }

    #[test]
    fn test_river_sink_is_reversed() {
        let mut grid = flat_grid();
        let e = grid.cell(CENTER).unwrap().neighbor_id(HexDirection::E).unwrap();
        grid.set_outgoing_river(e, HexDirection::W).unwrap();
        let meshes = triangulate_one(&grid, CENTER);
        let uvs = meshes.rivers.uvs();
        assert_eq!(uvs[0].x, 1.0);
        assert_abs_diff_eq!(uvs[0].y, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_waterfall_clipped_at_water_surface() {
        let mut grid = flat_grid();
        let ne = grid.cell(CENTER).unwrap().neighbor_id(HexDirection::NE).unwrap();
        grid.set_elevation(ne, 2).unwrap();
        grid.set_water_level(CENTER, 1).unwrap();
        grid.set_outgoing_river(ne, HexDirection::SW).unwrap();

        let meshes = triangulate_one(&grid, CENTER);
        let m = grid.metrics();
        // the lake swallows the river inside the cell; only the waterfall remains
        assert_eq!(meshes.rivers.triangle_count(), 2);
        let water_y = m.water_surface_y(1);
        let top_y = m.river_surface_y(2);
        let ys: Vec<f32> = meshes.rivers.vertices().iter().map(|v| v.y).collect();
        assert_abs_diff_eq!(ys[0], top_y, epsilon = 1e-4);
        assert_abs_diff_eq!(ys[1], top_y, epsilon = 1e-4);
        assert_abs_diff_eq!(ys[2], water_y, epsilon = 1e-4);
        assert_abs_diff_eq!(ys[3], water_y, epsilon = 1e-4);
    }
}
