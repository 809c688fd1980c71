//! Hex Cell Structure
//!
//! Represents one hexagonal map tile with its elevation, water, river, road
//! and color attributes, plus its six neighbour links.

use glam::{Vec3, Vec4};

use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;
use crate::metrics::{edge_type, HexEdgeType};

/// RGBA cell color
pub type HexColor = Vec4;

/// A single hexagonal cell
///
/// Triangulation treats cells as read-only input. Attributes are edited through
/// [`HexGrid`](crate::grid::HexGrid), which keeps the river and road
/// invariants intact:
/// - a road never crosses an edge that carries a river
/// - a river only flows downhill, or level out of a lake of matching height
/// - neighbour links are symmetric
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    /// Index into the owning grid (0 to cell_count-1)
    pub id: usize,

    /// Cube coordinates of the cell
    pub coordinates: HexCoordinates,

    /// Index of the chunk this cell is triangulated with
    pub chunk: usize,

    /// Center of the cell
    ///
    /// X/Z come from the grid layout. Y is the elevation height plus the
    /// per-cell vertical perturbation.
    pub position: Vec3,

    /// Elevation in integer levels
    pub elevation: i32,

    /// Water level in integer levels; the cell is underwater when it exceeds
    /// the elevation
    pub water_level: i32,

    pub color: HexColor,

    /// Feature density, 0..=3
    pub urban_level: u8,

    pub incoming_river: Option<HexDirection>,
    pub outgoing_river: Option<HexDirection>,

    /// Road flags indexed by direction
    pub roads: [bool; 6],

    /// Neighbour cell indices indexed by direction, `None` at the map border
    pub neighbors: [Option<usize>; 6],
}

impl HexCell {
    /// Create a flat, dry cell without rivers, roads or neighbours
    pub fn new(id: usize, coordinates: HexCoordinates, position: Vec3, color: HexColor) -> Self {
        Self {
            id,
            coordinates,
            chunk: 0,
            position,
            elevation: 0,
            water_level: 0,
            color,
            urban_level: 0,
            incoming_river: None,
            outgoing_river: None,
            roads: [false; 6],
            neighbors: [None; 6],
        }
    }

    #[inline]
    pub fn neighbor_id(&self, direction: HexDirection) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Edge type toward another cell
    #[inline]
    pub fn edge_type_to(&self, other: &HexCell) -> HexEdgeType {
        edge_type(self.elevation, other.elevation)
    }

    #[inline]
    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation
    }

    #[inline]
    pub fn has_incoming_river(&self) -> bool {
        self.incoming_river.is_some()
    }

    #[inline]
    pub fn has_outgoing_river(&self) -> bool {
        self.outgoing_river.is_some()
    }

    #[inline]
    pub fn has_river(&self) -> bool {
        self.incoming_river.is_some() || self.outgoing_river.is_some()
    }

    /// The river starts or ends in this cell
    #[inline]
    pub fn has_river_begin_or_end(&self) -> bool {
        self.incoming_river.is_some() != self.outgoing_river.is_some()
    }

    /// Direction of the single river edge of a source or sink cell
    pub fn river_begin_or_end_direction(&self) -> Option<HexDirection> {
        if !self.has_river_begin_or_end() {
            return None;
        }
        self.incoming_river.or(self.outgoing_river)
    }

    #[inline]
    pub fn has_river_through_edge(&self, direction: HexDirection) -> bool {
        self.incoming_river == Some(direction) || self.outgoing_river == Some(direction)
    }

    #[inline]
    pub fn has_road_through_edge(&self, direction: HexDirection) -> bool {
        self.roads[direction.index()]
    }

    #[inline]
    pub fn has_roads(&self) -> bool {
        self.roads.iter().any(|&r| r)
    }

    /// Elevation difference toward a neighbour, as an absolute value
    #[inline]
    pub fn elevation_difference(&self, other: &HexCell) -> u32 {
        self.elevation.abs_diff(other.elevation)
    }

    /// Whether a river may flow from this cell into `neighbor`
    #[inline]
    pub fn is_valid_river_destination(&self, neighbor: &HexCell) -> bool {
        self.elevation >= neighbor.elevation || self.water_level == neighbor.elevation
    }
}

/// Read-only access to cells and their neighbour relation
///
/// The triangulator consumes cells through this trait, so any container that
/// can resolve neighbour indices can be meshed.
pub trait CellGraph {
    fn cell(&self, id: usize) -> Option<&HexCell>;

    /// Neighbour of `cell` in `direction`, if any
    fn neighbor(&self, cell: &HexCell, direction: HexDirection) -> Option<&HexCell> {
        cell.neighbor_id(direction).and_then(|id| self.cell(id))
    }
}

impl CellGraph for [HexCell] {
    #[inline]
    fn cell(&self, id: usize) -> Option<&HexCell> {
        self.get(id)
    }
}

impl CellGraph for Vec<HexCell> {
    #[inline]
    fn cell(&self, id: usize) -> Option<&HexCell> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: usize) -> HexCell {
        HexCell::new(id, HexCoordinates::new(id as i32, 0), Vec3::ZERO, Vec4::ONE)
    }

    #[test]
    fn test_cell_creation() {
        let c = cell(3);
        assert_eq!(c.id, 3);
        assert!(!c.has_river());
        assert!(!c.has_roads());
        assert!(!c.is_underwater());
        assert!(c.neighbors.iter().all(Option::is_none));
    }

    #[test]
    fn test_river_queries() {
        let mut c = cell(0);
        c.incoming_river = Some(HexDirection::NE);
        assert!(c.has_river());
        assert!(c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), Some(HexDirection::NE));
        assert!(c.has_river_through_edge(HexDirection::NE));
        assert!(!c.has_river_through_edge(HexDirection::SW));

        c.outgoing_river = Some(HexDirection::SW);
        assert!(!c.has_river_begin_or_end());
        assert_eq!(c.river_begin_or_end_direction(), None);
        assert!(c.has_river_through_edge(HexDirection::SW));
    }

    #[test]
    fn test_water_and_roads() {
        let mut c = cell(0);
        c.water_level = 1;
        assert!(c.is_underwater());
        c.roads[HexDirection::W.index()] = true;
        assert!(c.has_roads());
        assert!(c.has_road_through_edge(HexDirection::W));
        assert!(!c.has_road_through_edge(HexDirection::E));
    }

    #[test]
    fn test_river_destination_rules() {
        let mut high = cell(0);
        let mut low = cell(1);
        high.elevation = 2;
        low.elevation = 1;
        assert!(high.is_valid_river_destination(&low));
        assert!(!low.is_valid_river_destination(&high));
        // A lake whose surface matches the destination elevation may spill over
        low.water_level = 2;
        assert!(low.is_valid_river_destination(&high));
    }

    #[test]
    fn test_cell_graph_neighbor_lookup() {
        let mut cells = vec![cell(0), cell(1)];
        cells[0].neighbors[HexDirection::E.index()] = Some(1);
        cells[1].neighbors[HexDirection::W.index()] = Some(0);

        let graph: &[HexCell] = &cells;
        let east = graph.neighbor(&cells[0], HexDirection::E);
        assert_eq!(east.map(|c| c.id), Some(1));
        assert!(graph.neighbor(&cells[0], HexDirection::NE).is_none());
        assert_eq!(cells[0].edge_type_to(&cells[1]), HexEdgeType::Flat);
    }
}
