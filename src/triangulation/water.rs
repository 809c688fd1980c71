//! Water surfaces
//!
//! Underwater cells get a flat surface at their water level. Toward dry
//! neighbours the surface turns into a shore strip whose V runs from 0 on the
//! open water to 1 on the land, and where a river meets the shore the strip
//! becomes an estuary.

use glam::{Vec2, Vec3};

use super::Triangulator;
use crate::cell::{CellGraph, HexCell};
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;

impl<'a, G: CellGraph + ?Sized> Triangulator<'a, G> {
    pub(super) fn triangulate_water(&mut self, direction: HexDirection, cell: &'a HexCell, mut center: Vec3) {
        center.y = self.metrics.water_surface_y(cell.water_level);

        match self.neighbor(cell, direction) {
            Some(neighbor) if !neighbor.is_underwater() => {
                self.triangulate_water_shore(direction, cell, neighbor, center);
            }
            neighbor => self.triangulate_open_water(direction, cell, neighbor, center),
        }
    }

    fn triangulate_open_water(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        neighbor: Option<&'a HexCell>,
        center: Vec3,
    ) {
        let m = self.metrics;
        let c1 = center + m.first_water_corner(direction);
        let c2 = center + m.second_water_corner(direction);
        self.meshes.water.add_triangle(m, center, c1, c2);

        if direction > HexDirection::SE || neighbor.is_none() {
            return;
        }

        let bridge = m.water_bridge(direction);
        let e1 = c1 + bridge;
        let e2 = c2 + bridge;
        self.meshes.water.add_quad(m, c1, c2, e1, e2);

        if direction <= HexDirection::E {
            match self.neighbor(cell, direction.next()) {
                Some(next) if next.is_underwater() => {
                    self.meshes
                        .water
                        .add_triangle(m, c2, e2, c2 + m.water_bridge(direction.next()));
                }
                _ => {}
            }
        }
    }

    fn triangulate_water_shore(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        neighbor: &'a HexCell,
        center: Vec3,
    ) {
        let m = self.metrics;
        let e1 = EdgeVertices::new(
            center + m.first_water_corner(direction),
            center + m.second_water_corner(direction),
        );
        let water = &mut self.meshes.water;
        water.add_triangle(m, center, e1.v1, e1.v2);
        water.add_triangle(m, center, e1.v2, e1.v3);
        water.add_triangle(m, center, e1.v3, e1.v4);
        water.add_triangle(m, center, e1.v4, e1.v5);

        // The far side of the shore is the neighbour's solid edge, at water height
        let mut center2 = neighbor.position;
        center2.y = center.y;
        let e2 = EdgeVertices::new(
            center2 + m.second_solid_corner(direction.opposite()),
            center2 + m.first_solid_corner(direction.opposite()),
        );

        if cell.has_river_through_edge(direction) {
            self.triangulate_estuary(e1, e2, cell.incoming_river == Some(direction));
        } else {
            let shore = &mut self.meshes.water_shore;
            shore.add_quad(m, e1.v1, e1.v2, e2.v1, e2.v2);
            shore.add_quad(m, e1.v2, e1.v3, e2.v2, e2.v3);
            shore.add_quad(m, e1.v3, e1.v4, e2.v3, e2.v4);
            shore.add_quad(m, e1.v4, e1.v5, e2.v4, e2.v5);
            for _ in 0..4 {
                shore.add_quad_uv_rect(0.0, 0.0, 0.0, 1.0);
            }
        }

        if let Some(next) = self.neighbor(cell, direction.next()) {
            let offset = if next.is_underwater() {
                m.first_water_corner(direction.previous())
            } else {
                m.first_solid_corner(direction.previous())
            };
            let mut v3 = next.position + offset;
            v3.y = center.y;
            let shore = &mut self.meshes.water_shore;
            shore.add_triangle(m, e1.v5, e2.v5, v3);
            shore.add_triangle_uv(
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, if next.is_underwater() { 0.0 } else { 1.0 }),
            );
        }
    }

    /// Shore strip where a river enters or leaves the water
    ///
    /// The two outer slivers stay plain shore. The middle becomes a fan
    /// mapped for both the shore fade (UV) and the river flow (UV2), whose
    /// direction depends on whether the river flows into the water.
    fn triangulate_estuary(&mut self, e1: EdgeVertices, e2: EdgeVertices, incoming_river: bool) {
        let m = self.metrics;
        let shore = &mut self.meshes.water_shore;
        shore.add_triangle(m, e2.v1, e1.v2, e1.v1);
        shore.add_triangle(m, e2.v5, e1.v5, e1.v4);
        shore.add_triangle_uv(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
        shore.add_triangle_uv(Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));

        let estuaries = &mut self.meshes.estuaries;
        estuaries.add_quad(m, e2.v1, e1.v2, e2.v2, e1.v3);
        estuaries.add_triangle(m, e1.v3, e2.v2, e2.v4);
        estuaries.add_quad(m, e1.v3, e1.v4, e2.v4, e2.v5);

        estuaries.add_quad_uv(
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 0.0),
        );
        estuaries.add_triangle_uv(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        estuaries.add_quad_uv(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        );

        if incoming_river {
            estuaries.add_quad_uv2(
                Vec2::new(1.5, 1.0),
                Vec2::new(0.7, 1.15),
                Vec2::new(1.0, 0.8),
                Vec2::new(0.5, 1.1),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, 1.1), Vec2::new(1.0, 0.8), Vec2::new(0.0, 0.8));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, 1.1),
                Vec2::new(0.3, 1.15),
                Vec2::new(0.0, 0.8),
                Vec2::new(-0.5, 1.0),
            );
        } else {
            estuaries.add_quad_uv2(
                Vec2::new(-0.5, -0.2),
                Vec2::new(0.3, -0.35),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.5, -0.3),
            );
            estuaries.add_triangle_uv2(Vec2::new(0.5, -0.3), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
            estuaries.add_quad_uv2(
                Vec2::new(0.5, -0.3),
                Vec2::new(0.7, -0.35),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.5, -0.2),
            );
        }
    }
}
