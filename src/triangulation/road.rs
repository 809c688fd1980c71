//! Road overlay
//!
//! Roads are drawn on their own mesh slightly above the terrain. U runs across
//! the road: 1 along the centerline, 0 at the edges, so a shader can fade the
//! borders.

use glam::{Vec2, Vec3};

use super::Triangulator;
use crate::cell::{CellGraph, HexCell};
use crate::direction::HexDirection;
use crate::edge::EdgeVertices;
use crate::metrics::INNER_TO_OUTER;

/// How far toward the edge corners the road reaches inside the wedge of
/// `direction`, as fractions for the left (x) and right (y) corner
pub(super) fn road_interpolators(direction: HexDirection, cell: &HexCell) -> Vec2 {
    if cell.has_road_through_edge(direction) {
        return Vec2::splat(0.5);
    }
    Vec2::new(
        if cell.has_road_through_edge(direction.previous()) { 0.5 } else { 0.25 },
        if cell.has_road_through_edge(direction.next()) { 0.5 } else { 0.25 },
    )
}

impl<'a, G: CellGraph + ?Sized> Triangulator<'a, G> {
    /// Two quads forming a road piece between two edge triplets
    pub(super) fn triangulate_road_segment(
        &mut self,
        v1: Vec3,
        v2: Vec3,
        v3: Vec3,
        v4: Vec3,
        v5: Vec3,
        v6: Vec3,
    ) {
        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_quad(m, v1, v2, v4, v5);
        roads.add_quad(m, v2, v3, v5, v6);
        roads.add_quad_uv_rect(0.0, 1.0, 0.0, 0.0);
        roads.add_quad_uv_rect(1.0, 0.0, 0.0, 0.0);
    }

    /// Road inside one wedge of the cell
    ///
    /// With a road through the edge, the wedge gets a full road piece out to
    /// the edge; otherwise only a sliver that rounds off the road network in
    /// the middle of the cell.
    pub(super) fn triangulate_road(
        &mut self,
        center: Vec3,
        m_l: Vec3,
        m_r: Vec3,
        e: EdgeVertices,
        has_road_through_edge: bool,
    ) {
        if !has_road_through_edge {
            self.triangulate_road_edge(center, m_l, m_r);
            return;
        }

        let m_c = m_l.lerp(m_r, 0.5);
        self.triangulate_road_segment(m_l, m_c, m_r, e.v2, e.v3, e.v4);

        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_triangle(m, center, m_l, m_c);
        roads.add_triangle(m, center, m_c, m_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0));
    }

    pub(super) fn triangulate_road_edge(&mut self, center: Vec3, m_l: Vec3, m_r: Vec3) {
        let m = self.metrics;
        let roads = &mut self.meshes.roads;
        roads.add_triangle(m, center, m_l, m_r);
        roads.add_triangle_uv(Vec2::new(1.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0));
    }

    /// Roads in a cell that also holds a river
    ///
    /// The road center is pushed off the channel. Road pieces that would end
    /// up stranded on the far side of the river are dropped.
    pub(super) fn triangulate_road_adjacent_to_river(
        &mut self,
        direction: HexDirection,
        cell: &'a HexCell,
        mut center: Vec3,
        e: EdgeVertices,
    ) {
        let m = self.metrics;
        let has_road_through_edge = cell.has_road_through_edge(direction);
        let previous_has_river = cell.has_river_through_edge(direction.previous());
        let next_has_river = cell.has_river_through_edge(direction.next());
        let interpolators = road_interpolators(direction, cell);
        let mut road_center = center;

        match (cell.incoming_river, cell.outgoing_river) {
            (Some(incoming), None) | (None, Some(incoming)) => {
                // `incoming` is the single river edge of a source or sink
                road_center += m.solid_edge_middle(incoming.opposite()) * (1.0 / 3.0);
            }
            (Some(incoming), Some(outgoing)) if incoming == outgoing.opposite() => {
                let corner = if previous_has_river {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.next()) {
                        return;
                    }
                    m.second_solid_corner(direction)
                } else {
                    if !has_road_through_edge && !cell.has_road_through_edge(direction.previous()) {
                        return;
                    }
                    m.first_solid_corner(direction)
                };
                road_center += corner * 0.5;
                center += corner * 0.25;
            }
            (Some(incoming), Some(outgoing)) if incoming == outgoing.previous() => {
                road_center -= m.second_corner(incoming) * 0.2;
            }
            (Some(incoming), Some(outgoing)) if incoming == outgoing.next() => {
                road_center -= m.first_corner(incoming) * 0.2;
            }
            _ if previous_has_river && next_has_river => {
                if !has_road_through_edge {
                    return;
                }
                let offset = m.solid_edge_middle(direction) * INNER_TO_OUTER;
                road_center += offset * 0.7;
                center += offset * 0.5;
            }
            _ => {
                let middle = if previous_has_river {
                    direction.next()
                } else if next_has_river {
                    direction.previous()
                } else {
                    direction
                };
                if !cell.has_road_through_edge(middle)
                    && !cell.has_road_through_edge(middle.previous())
                    && !cell.has_road_through_edge(middle.next())
                {
                    return;
                }
                road_center += m.solid_edge_middle(middle) * 0.25;
            }
        }

        let m_l = road_center.lerp(e.v1, interpolators.x);
        let m_r = road_center.lerp(e.v5, interpolators.y);
        self.triangulate_road(road_center, m_l, m_r, e, has_road_through_edge);

        if previous_has_river {
            self.triangulate_road_edge(road_center, center, m_l);
        }
        if next_has_river {
            self.triangulate_road_edge(road_center, m_r, center);
        }
    }
}
