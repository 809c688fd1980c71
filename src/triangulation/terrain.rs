//! Terrain surface: fans, bridges, terraces and three-cell corners

use glam::{Vec3, Vec4};

use super::Triangulator;
use crate::cell::{CellGraph, HexCell};
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::HexEdgeType;

impl<'a, G: CellGraph + ?Sized> Triangulator<'a, G> {
    /// Four triangles from `center` to the edge, in one color
    pub(super) fn triangulate_edge_fan(&mut self, center: Vec3, edge: EdgeVertices, color: Vec4) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        for (a, b) in [
            (edge.v1, edge.v2),
            (edge.v2, edge.v3),
            (edge.v3, edge.v4),
            (edge.v4, edge.v5),
        ] {
            terrain.add_triangle(m, center, a, b);
            terrain.add_triangle_color(color);
        }
    }

    /// Four quads joining two edges, blending `c1` into `c2`
    pub(super) fn triangulate_edge_strip(
        &mut self,
        e1: EdgeVertices,
        c1: Vec4,
        e2: EdgeVertices,
        c2: Vec4,
        has_road: bool,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;
        let inner = e1.to_array();
        let outer = e2.to_array();
        for i in 0..4 {
            terrain.add_quad(m, inner[i], inner[i + 1], outer[i], outer[i + 1]);
            terrain.add_quad_color_pair(c1, c2);
        }

        if has_road {
            self.triangulate_road_segment(e1.v2, e1.v3, e1.v4, e2.v2, e2.v3, e2.v4);
        }
    }

    /// Bridge toward the neighbour in `direction`, plus the corner for NE and E
    pub(super) fn triangulate_connection(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        e1: EdgeVertices,
    ) {
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return;
        };
        let m = self.metrics;

        let mut bridge = m.bridge(direction);
        bridge.y = neighbor.position.y - cell.position.y;
        let mut e2 = EdgeVertices::new(e1.v1 + bridge, e1.v5 + bridge);

        let has_river = cell.has_river_through_edge(direction);
        let has_road = cell.has_road_through_edge(direction);

        if has_river {
            e2.v3.y = m.stream_bed_y(neighbor.elevation);
            self.triangulate_river_connection(direction, cell, neighbor, &e1, &e2);
        }

        if cell.edge_type_to(neighbor) == HexEdgeType::Slope {
            self.triangulate_edge_terraces(e1, cell, e2, neighbor, has_road);
        } else {
            self.triangulate_edge_strip(e1, cell.color, e2, neighbor.color, has_road);
        }

        if direction > HexDirection::E {
            return;
        }
        let Some(next_neighbor) = self.neighbor(cell, direction.next()) else {
            return;
        };

        let mut v5 = e1.v5 + m.bridge(direction.next());
        v5.y = next_neighbor.position.y;

        // Lowest cell first, keeping the clockwise (bottom, left, right) order
        if cell.elevation <= neighbor.elevation {
            if cell.elevation <= next_neighbor.elevation {
                self.triangulate_corner(e1.v5, cell, e2.v5, neighbor, v5, next_neighbor);
            } else {
                self.triangulate_corner(v5, next_neighbor, e1.v5, cell, e2.v5, neighbor);
            }
        } else if neighbor.elevation <= next_neighbor.elevation {
            self.triangulate_corner(e2.v5, neighbor, v5, next_neighbor, e1.v5, cell);
        } else {
            self.triangulate_corner(v5, next_neighbor, e1.v5, cell, e2.v5, neighbor);
        }
    }

    /// Terraced bridge: `terrace_steps` strips from `begin` to `end`
    fn triangulate_edge_terraces(
        &mut self,
        begin: EdgeVertices,
        begin_cell: &HexCell,
        end: EdgeVertices,
        end_cell: &HexCell,
        has_road: bool,
    ) {
        let m = self.metrics;
        let mut e2 = EdgeVertices::terrace_lerp(&begin, &end, 1, m);
        let mut c2 = m.terrace_lerp_color(begin_cell.color, end_cell.color, 1);
        self.triangulate_edge_strip(begin, begin_cell.color, e2, c2, has_road);

        for step in 2..m.terrace_steps() {
            let e1 = e2;
            let c1 = c2;
            e2 = EdgeVertices::terrace_lerp(&begin, &end, step, m);
            c2 = m.terrace_lerp_color(begin_cell.color, end_cell.color, step);
            self.triangulate_edge_strip(e1, c1, e2, c2, has_road);
        }

        self.triangulate_edge_strip(e2, c2, end, end_cell.color, has_road);
    }

    /// Fill the triangle where three cells meet
    ///
    /// `bottom` must be the lowest cell, with `left` and `right` following
    /// clockwise.
    fn triangulate_corner(
        &mut self,
        bottom: Vec3,
        bottom_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let left_edge = bottom_cell.edge_type_to(left_cell);
        let right_edge = bottom_cell.edge_type_to(right_cell);

        match (left_edge, right_edge) {
            (HexEdgeType::Slope, HexEdgeType::Slope) => {
                self.triangulate_corner_terraces(bottom, bottom_cell, left, left_cell, right, right_cell)
            }
            (HexEdgeType::Slope, HexEdgeType::Flat) => {
                self.triangulate_corner_terraces(left, left_cell, right, right_cell, bottom, bottom_cell)
            }
            (HexEdgeType::Slope, _) => self.triangulate_corner_terraces_cliff(
                bottom,
                bottom_cell,
                left,
                left_cell,
                right,
                right_cell,
            ),
            (HexEdgeType::Flat, HexEdgeType::Slope) => {
                self.triangulate_corner_terraces(right, right_cell, bottom, bottom_cell, left, left_cell)
            }
            (_, HexEdgeType::Slope) => self.triangulate_corner_cliff_terraces(
                bottom,
                bottom_cell,
                left,
                left_cell,
                right,
                right_cell,
            ),
            _ if left_cell.edge_type_to(right_cell) == HexEdgeType::Slope => {
                if left_cell.elevation < right_cell.elevation {
                    self.triangulate_corner_cliff_terraces(
                        right,
                        right_cell,
                        bottom,
                        bottom_cell,
                        left,
                        left_cell,
                    );
                } else {
                    self.triangulate_corner_terraces_cliff(
                        left,
                        left_cell,
                        right,
                        right_cell,
                        bottom,
                        bottom_cell,
                    );
                }
            }
            _ => {
                let m = self.metrics;
                let terrain = &mut self.meshes.terrain;
                terrain.add_triangle(m, bottom, left, right);
                terrain.add_triangle_colors(bottom_cell.color, left_cell.color, right_cell.color);
            }
        }
    }

    /// Corner with terraces on both sides of `begin`
    fn triangulate_corner_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;

        let mut v3 = m.terrace_lerp(begin, left, 1);
        let mut v4 = m.terrace_lerp(begin, right, 1);
        let mut c3 = m.terrace_lerp_color(begin_cell.color, left_cell.color, 1);
        let mut c4 = m.terrace_lerp_color(begin_cell.color, right_cell.color, 1);

        terrain.add_triangle(m, begin, v3, v4);
        terrain.add_triangle_colors(begin_cell.color, c3, c4);

        for step in 2..m.terrace_steps() {
            let (v1, v2, c1, c2) = (v3, v4, c3, c4);
            v3 = m.terrace_lerp(begin, left, step);
            v4 = m.terrace_lerp(begin, right, step);
            c3 = m.terrace_lerp_color(begin_cell.color, left_cell.color, step);
            c4 = m.terrace_lerp_color(begin_cell.color, right_cell.color, step);
            terrain.add_quad(m, v1, v2, v3, v4);
            terrain.add_quad_colors(c1, c2, c3, c4);
        }

        terrain.add_quad(m, v3, v4, left, right);
        terrain.add_quad_colors(c3, c4, left_cell.color, right_cell.color);
    }

    /// Terraces toward `left`, cliff toward `right`
    fn triangulate_corner_terraces_cliff(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let b = boundary_fraction(begin_cell, right_cell);
        let boundary = m.perturb(begin).lerp(m.perturb(right), b);
        let boundary_color = begin_cell.color.lerp(right_cell.color, b);

        self.triangulate_boundary_triangle(begin, begin_cell, left, left_cell, boundary, boundary_color);
        self.close_cliff_corner(left, left_cell, right, right_cell, boundary, boundary_color);
    }

    /// Cliff toward `left`, terraces toward `right`
    fn triangulate_corner_cliff_terraces(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
    ) {
        let m = self.metrics;
        let b = boundary_fraction(begin_cell, left_cell);
        let boundary = m.perturb(begin).lerp(m.perturb(left), b);
        let boundary_color = begin_cell.color.lerp(left_cell.color, b);

        self.triangulate_boundary_triangle(right, right_cell, begin, begin_cell, boundary, boundary_color);
        self.close_cliff_corner(left, left_cell, right, right_cell, boundary, boundary_color);
    }

    /// Top part of a mixed corner, between `left`, `right` and the boundary
    fn close_cliff_corner(
        &mut self,
        left: Vec3,
        left_cell: &HexCell,
        right: Vec3,
        right_cell: &HexCell,
        boundary: Vec3,
        boundary_color: Vec4,
    ) {
        if left_cell.edge_type_to(right_cell) == HexEdgeType::Slope {
            self.triangulate_boundary_triangle(left, left_cell, right, right_cell, boundary, boundary_color);
        } else {
            let m = self.metrics;
            let terrain = &mut self.meshes.terrain;
            terrain.add_triangle_unperturbed(m.perturb(left), m.perturb(right), boundary);
            terrain.add_triangle_colors(left_cell.color, right_cell.color, boundary_color);
        }
    }

    /// Terrace steps from `begin` to `left` collapsing into `boundary`
    ///
    /// The boundary point is already perturbed; perturbing it again would pull
    /// it off the cliff edge, so these triangles are added unperturbed.
    fn triangulate_boundary_triangle(
        &mut self,
        begin: Vec3,
        begin_cell: &HexCell,
        left: Vec3,
        left_cell: &HexCell,
        boundary: Vec3,
        boundary_color: Vec4,
    ) {
        let m = self.metrics;
        let terrain = &mut self.meshes.terrain;

        let mut v2 = m.perturb(m.terrace_lerp(begin, left, 1));
        let mut c2 = m.terrace_lerp_color(begin_cell.color, left_cell.color, 1);

        terrain.add_triangle_unperturbed(m.perturb(begin), v2, boundary);
        terrain.add_triangle_colors(begin_cell.color, c2, boundary_color);

        for step in 2..m.terrace_steps() {
            let v1 = v2;
            let c1 = c2;
            v2 = m.perturb(m.terrace_lerp(begin, left, step));
            c2 = m.terrace_lerp_color(begin_cell.color, left_cell.color, step);
            terrain.add_triangle_unperturbed(v1, v2, boundary);
            terrain.add_triangle_colors(c1, c2, boundary_color);
        }

        terrain.add_triangle_unperturbed(v2, m.perturb(left), boundary);
        terrain.add_triangle_colors(c2, left_cell.color, boundary_color);
    }
}

/// Fraction of the way up a cliff where the terraces of its neighbour end
fn boundary_fraction(bottom: &HexCell, top: &HexCell) -> f32 {
    let delta = top.elevation.abs_diff(bottom.elevation);
    debug_assert!(delta != 0, "cliff boundary between cells of equal elevation");
    1.0 / delta as f32
}
