//! HexGrid: cell storage, chunk membership and editing

use glam::Vec3;

use crate::cell::{CellGraph, HexCell, HexColor};
use crate::config::HexMapConfig;
use crate::coordinates::HexCoordinates;
use crate::direction::HexDirection;
use crate::error::{HexMapError, Result};
use crate::metrics::HexMetrics;

/// A rectangular map of hexagon cells split into chunks
///
/// The grid owns the cells and keeps their invariants intact while they are
/// edited. Every edit records which chunks need a new triangulation; collect
/// them with [`take_dirty_chunks`](Self::take_dirty_chunks).
///
/// # Examples
///
/// ```
/// use rust_hex_map::*;
///
/// let config = HexMapConfigBuilder::new()
///     .seed(42)
///     .map_size(MapSize::Custom { chunk_count_x: 1, chunk_count_z: 1 })
///     .build()
///     .unwrap();
///
/// let mut grid = HexGrid::new(config).unwrap();
/// println!("Created {} cells", grid.cell_count());
///
/// grid.set_elevation(12, 2).unwrap();
/// grid.add_road(12, HexDirection::E).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HexGrid {
    metrics: HexMetrics,

    /// All cells, row by row (indexed by cell ID)
    cells: Vec<HexCell>,

    /// Cell IDs of each chunk
    chunks: Vec<Vec<usize>>,

    /// Dirty flag per chunk
    dirty: Vec<bool>,

    cell_count_x: usize,
    cell_count_z: usize,
}

impl HexGrid {
    /// Lay out `chunk_count × chunk_size` flat cells and wire their neighbours
    ///
    /// Every chunk starts out dirty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails
    /// [`HexMapConfig::validate`]
    pub fn new(config: HexMapConfig) -> Result<Self> {
        config.validate()?;
        let metrics = HexMetrics::new(config);
        let config = metrics.config();
        let (width, height) = config.cell_counts();
        let (chunk_count_x, _) = config.map_size.chunk_counts();
        let chunk_count = config.chunk_count();
        let default_color = config.default_color;
        let (chunk_size_x, chunk_size_z) = (config.chunk_size_x, config.chunk_size_z);

        let mut cells = Vec::with_capacity(width * height);
        let mut chunks = vec![Vec::with_capacity(chunk_size_x * chunk_size_z); chunk_count];

        for z in 0..height {
            for x in 0..width {
                let id = cells.len();
                let mut position = Vec3::new(
                    (x as f32 + z as f32 * 0.5 - (z / 2) as f32) * metrics.inner_radius() * 2.0,
                    0.0,
                    z as f32 * metrics.outer_radius() * 1.5,
                );
                position.y = metrics.cell_y(0, position);

                let coordinates = HexCoordinates::from_offset_coordinates(x as i32, z as i32);
                let mut cell = HexCell::new(id, coordinates, position, default_color);
                cell.chunk = x / chunk_size_x + (z / chunk_size_z) * chunk_count_x;
                chunks[cell.chunk].push(id);
                cells.push(cell);

                if x > 0 {
                    link(&mut cells, id, HexDirection::W, id - 1);
                }
                if z > 0 {
                    if z % 2 == 0 {
                        link(&mut cells, id, HexDirection::SE, id - width);
                        if x > 0 {
                            link(&mut cells, id, HexDirection::SW, id - width - 1);
                        }
                    } else {
                        link(&mut cells, id, HexDirection::SW, id - width);
                        if x < width - 1 {
                            link(&mut cells, id, HexDirection::SE, id - width + 1);
                        }
                    }
                }
            }
        }

        log::debug!(
            "Created hex grid: {}x{} cells in {} chunks",
            width,
            height,
            chunk_count
        );

        Ok(Self {
            metrics,
            cells,
            chunks,
            dirty: vec![true; chunk_count],
            cell_count_x: width,
            cell_count_z: height,
        })
    }

    #[inline]
    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    #[inline]
    pub fn config(&self) -> &HexMapConfig {
        self.metrics.config()
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cells along X and Z
    #[inline]
    pub fn cell_counts(&self) -> (usize, usize) {
        (self.cell_count_x, self.cell_count_z)
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn cell(&self, id: usize) -> Option<&HexCell> {
        self.cells.get(id)
    }

    #[inline]
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Cell IDs belonging to a chunk
    ///
    /// # Errors
    ///
    /// Returns `ChunkNotFound` if the chunk index is out of bounds
    pub fn cells_in_chunk(&self, chunk: usize) -> Result<&[usize]> {
        self.chunks
            .get(chunk)
            .map(Vec::as_slice)
            .ok_or(HexMapError::ChunkNotFound(chunk))
    }

    /// Find the cell under a world position (Y is ignored)
    pub fn cell_at(&self, position: Vec3) -> Option<&HexCell> {
        self.cell_by_coordinates(HexCoordinates::from_position(position, &self.metrics))
    }

    pub fn cell_by_coordinates(&self, coordinates: HexCoordinates) -> Option<&HexCell> {
        let z = coordinates.z();
        let x = coordinates.offset_x();
        if z < 0 || x < 0 {
            return None;
        }
        let (x, z) = (x as usize, z as usize);
        if x >= self.cell_count_x || z >= self.cell_count_z {
            return None;
        }
        self.cells.get(x + z * self.cell_count_x)
    }

    // ------------------------------------------------------------------
    // Dirty chunks
    // ------------------------------------------------------------------

    #[inline]
    pub fn is_chunk_dirty(&self, chunk: usize) -> bool {
        self.dirty.get(chunk).copied().unwrap_or(false)
    }

    /// Dirty chunk indices in ascending order; the flags are reset
    pub fn take_dirty_chunks(&mut self) -> Vec<usize> {
        let chunks = self
            .dirty
            .iter()
            .enumerate()
            .filter(|(_, &dirty)| dirty)
            .map(|(chunk, _)| chunk)
            .collect();
        self.dirty.fill(false);
        chunks
    }

    /// Mark every chunk dirty
    pub fn mark_all_dirty(&mut self) {
        self.dirty.fill(true);
    }

    /// Mark the cell's chunk, and optionally the chunks of its neighbours
    fn refresh(&mut self, id: usize, include_neighbors: bool) {
        let cell = &self.cells[id];
        self.dirty[cell.chunk] = true;
        if include_neighbors {
            for neighbor in cell.neighbors.iter().flatten() {
                self.dirty[self.cells[*neighbor].chunk] = true;
            }
        }
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    fn check(&self, id: usize) -> Result<usize> {
        if id < self.cells.len() {
            Ok(id)
        } else {
            Err(HexMapError::CellNotFound(id))
        }
    }

    /// Change the elevation of a cell
    ///
    /// The cell's Y is recomputed, rivers that would now flow uphill are
    /// removed and roads climbing a cliff are dropped.
    pub fn set_elevation(&mut self, id: usize, elevation: i32) -> Result<()> {
        let id = self.check(id)?;
        if self.cells[id].elevation == elevation {
            return Ok(());
        }

        let cell = &mut self.cells[id];
        cell.elevation = elevation;
        cell.position.y = self.metrics.cell_y(elevation, cell.position);

        self.validate_rivers(id);

        for direction in HexDirection::ALL {
            if !self.cells[id].has_road_through_edge(direction) {
                continue;
            }
            if let Some(neighbor) = self.cells[id].neighbor_id(direction) {
                if self.cells[id].elevation_difference(&self.cells[neighbor]) > 1 {
                    self.set_road(id, direction, false);
                }
            }
        }

        self.refresh(id, true);
        Ok(())
    }

    /// Change the water level; rivers that lose their outlet are removed
    pub fn set_water_level(&mut self, id: usize, water_level: i32) -> Result<()> {
        let id = self.check(id)?;
        if self.cells[id].water_level == water_level {
            return Ok(());
        }
        self.cells[id].water_level = water_level;
        self.validate_rivers(id);
        self.refresh(id, true);
        Ok(())
    }

    pub fn set_color(&mut self, id: usize, color: HexColor) -> Result<()> {
        let id = self.check(id)?;
        if self.cells[id].color == color {
            return Ok(());
        }
        self.cells[id].color = color;
        self.refresh(id, true);
        Ok(())
    }

    /// Set the feature density, clamped to 0..=3
    pub fn set_urban_level(&mut self, id: usize, level: u8) -> Result<()> {
        let id = self.check(id)?;
        let level = level.min(3);
        if self.cells[id].urban_level == level {
            return Ok(());
        }
        self.cells[id].urban_level = level;
        self.refresh(id, false);
        Ok(())
    }

    /// Start a river in `id` flowing toward `direction`
    ///
    /// A previous outgoing river of the cell and the destination's incoming
    /// river are replaced. A road across the river edge is removed.
    ///
    /// # Errors
    ///
    /// - `CellNotFound` if the cell ID is out of bounds
    /// - `InvalidRiver` if there is no neighbour in that direction or the
    ///   river would flow uphill
    pub fn try_set_outgoing_river(&mut self, id: usize, direction: HexDirection) -> Result<()> {
        let id = self.check(id)?;
        if self.cells[id].outgoing_river == Some(direction) {
            return Ok(());
        }

        let neighbor = self.cells[id]
            .neighbor_id(direction)
            .ok_or(HexMapError::InvalidRiver {
                cell: id,
                direction,
                reason: "no neighbour in that direction",
            })?;
        if !self.cells[id].is_valid_river_destination(&self.cells[neighbor]) {
            return Err(HexMapError::InvalidRiver {
                cell: id,
                direction,
                reason: "destination is higher than the source",
            });
        }

        self.clear_outgoing_river(id);
        if self.cells[id].incoming_river == Some(direction) {
            self.clear_incoming_river(id);
        }
        self.cells[id].outgoing_river = Some(direction);

        self.clear_incoming_river(neighbor);
        self.cells[neighbor].incoming_river = Some(direction.opposite());

        self.set_road(id, direction, false);
        self.refresh(id, false);
        self.refresh(neighbor, false);
        Ok(())
    }

    /// Like [`try_set_outgoing_river`](Self::try_set_outgoing_river), but an
    /// invalid river is silently ignored
    pub fn set_outgoing_river(&mut self, id: usize, direction: HexDirection) -> Result<()> {
        match self.try_set_outgoing_river(id, direction) {
            Err(err @ HexMapError::InvalidRiver { .. }) => {
                log::debug!("Ignoring river edit: {}", err);
                Ok(())
            }
            other => other,
        }
    }

    pub fn remove_outgoing_river(&mut self, id: usize) -> Result<()> {
        let id = self.check(id)?;
        self.clear_outgoing_river(id);
        Ok(())
    }

    pub fn remove_incoming_river(&mut self, id: usize) -> Result<()> {
        let id = self.check(id)?;
        self.clear_incoming_river(id);
        Ok(())
    }

    /// Remove both rivers of a cell
    pub fn remove_river(&mut self, id: usize) -> Result<()> {
        self.remove_outgoing_river(id)?;
        self.remove_incoming_river(id)
    }

    /// Add a road from `id` across the edge in `direction`
    ///
    /// # Errors
    ///
    /// - `CellNotFound` if the cell ID is out of bounds
    /// - `InvalidRoad` if there is no neighbour, the edge carries a river or
    ///   the edge is a cliff
    pub fn try_add_road(&mut self, id: usize, direction: HexDirection) -> Result<()> {
        let id = self.check(id)?;
        let cell = &self.cells[id];
        if cell.has_road_through_edge(direction) {
            return Ok(());
        }

        let invalid = |reason| HexMapError::InvalidRoad {
            cell: id,
            direction,
            reason,
        };
        let neighbor = cell
            .neighbor_id(direction)
            .ok_or_else(|| invalid("no neighbour in that direction"))?;
        if cell.has_river_through_edge(direction) {
            return Err(invalid("edge carries a river"));
        }
        if cell.elevation_difference(&self.cells[neighbor]) > 1 {
            return Err(invalid("edge is a cliff"));
        }

        self.set_road(id, direction, true);
        Ok(())
    }

    /// Like [`try_add_road`](Self::try_add_road), but an invalid road is
    /// silently ignored
    pub fn add_road(&mut self, id: usize, direction: HexDirection) -> Result<()> {
        match self.try_add_road(id, direction) {
            Err(err @ HexMapError::InvalidRoad { .. }) => {
                log::debug!("Ignoring road edit: {}", err);
                Ok(())
            }
            other => other,
        }
    }

    pub fn remove_roads(&mut self, id: usize) -> Result<()> {
        let id = self.check(id)?;
        for direction in HexDirection::ALL {
            if self.cells[id].has_road_through_edge(direction) {
                self.set_road(id, direction, false);
            }
        }
        Ok(())
    }

    /// Set the road flag on both sides of an edge
    fn set_road(&mut self, id: usize, direction: HexDirection, state: bool) {
        self.cells[id].roads[direction.index()] = state;
        self.refresh(id, false);
        if let Some(neighbor) = self.cells[id].neighbor_id(direction) {
            self.cells[neighbor].roads[direction.opposite().index()] = state;
            self.refresh(neighbor, false);
        }
    }

    fn clear_outgoing_river(&mut self, id: usize) {
        let Some(direction) = self.cells[id].outgoing_river.take() else {
            return;
        };
        self.refresh(id, false);
        if let Some(neighbor) = self.cells[id].neighbor_id(direction) {
            self.cells[neighbor].incoming_river = None;
            self.refresh(neighbor, false);
        }
    }

    fn clear_incoming_river(&mut self, id: usize) {
        let Some(direction) = self.cells[id].incoming_river.take() else {
            return;
        };
        self.refresh(id, false);
        if let Some(neighbor) = self.cells[id].neighbor_id(direction) {
            self.cells[neighbor].outgoing_river = None;
            self.refresh(neighbor, false);
        }
    }

    /// Drop rivers that no longer flow downhill after an elevation or water edit
    fn validate_rivers(&mut self, id: usize) {
        let cell = &self.cells[id];
        let outgoing_valid = match cell.outgoing_river.and_then(|d| cell.neighbor_id(d)) {
            Some(neighbor) => cell.is_valid_river_destination(&self.cells[neighbor]),
            None => true,
        };
        let incoming_valid = match cell.incoming_river.and_then(|d| cell.neighbor_id(d)) {
            Some(neighbor) => self.cells[neighbor].is_valid_river_destination(cell),
            None => true,
        };

        if !outgoing_valid {
            self.clear_outgoing_river(id);
        }
        if !incoming_valid {
            self.clear_incoming_river(id);
        }
    }
}

impl CellGraph for HexGrid {
    #[inline]
    fn cell(&self, id: usize) -> Option<&HexCell> {
        self.cells.get(id)
    }
}

/// Link two cells in opposite directions
fn link(cells: &mut [HexCell], id: usize, direction: HexDirection, other: usize) {
    cells[id].neighbors[direction.index()] = Some(other);
    cells[other].neighbors[direction.opposite().index()] = Some(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HexMapConfigBuilder, MapSize};
    use crate::metrics::OUTER_TO_INNER;
    use approx::assert_abs_diff_eq;
    use glam::Vec4;

    fn grid(chunks_x: usize, chunks_z: usize) -> HexGrid {
        let config = HexMapConfigBuilder::new()
            .seed(5)
            .map_size(MapSize::Custom {
                chunk_count_x: chunks_x,
                chunk_count_z: chunks_z,
            })
            .chunk_size(3, 3)
            .unwrap()
            .perturbation(0.0, 0.0)
            .unwrap()
            .build()
            .unwrap();
        HexGrid::new(config).unwrap()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = HexMapConfig {
            chunk_size_x: 0,
            ..HexMapConfig::default()
        };
        assert!(matches!(HexGrid::new(config), Err(HexMapError::InvalidConfig(_))));
    }

    #[test]
    fn test_layout() {
        let grid = grid(2, 1);
        assert_eq!(grid.cell_count(), 18);
        assert_eq!(grid.cell_counts(), (6, 3));
        assert_eq!(grid.chunk_count(), 2);

        let inner = 10.0 * OUTER_TO_INNER;
        let p = grid.cell(1).unwrap().position;
        assert_abs_diff_eq!(p.x, 2.0 * inner, epsilon = 1e-4);
        // odd rows are shifted by half a cell
        let p = grid.cell(6).unwrap().position;
        assert_abs_diff_eq!(p.x, inner, epsilon = 1e-4);
        assert_abs_diff_eq!(p.z, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_neighbors_are_symmetric() {
        let grid = grid(2, 2);
        for cell in grid.cells() {
            for direction in HexDirection::ALL {
                if let Some(n) = cell.neighbor_id(direction) {
                    let neighbor = grid.cell(n).unwrap();
                    assert_eq!(neighbor.neighbor_id(direction.opposite()), Some(cell.id));
                    assert_eq!(cell.coordinates.distance_to(neighbor.coordinates), 1);
                }
            }
        }
    }

    #[test]
    fn test_chunk_membership() {
        let grid = grid(2, 1);
        assert_eq!(grid.cells_in_chunk(0).unwrap(), &[0, 1, 2, 6, 7, 8, 12, 13, 14]);
        assert_eq!(grid.cell(3).unwrap().chunk, 1);
        assert_eq!(grid.cells_in_chunk(2), Err(HexMapError::ChunkNotFound(2)));
    }

    #[test]
    fn test_cell_at_finds_every_cell() {
        let grid = grid(2, 2);
        for cell in grid.cells() {
            let offset = Vec3::new(1.5, 0.0, -2.0);
            assert_eq!(grid.cell_at(cell.position + offset).map(|c| c.id), Some(cell.id));
        }
        assert!(grid.cell_at(Vec3::new(-50.0, 0.0, -50.0)).is_none());
    }

    #[test]
    fn test_unknown_cell_is_an_error() {
        let mut grid = grid(1, 1);
        assert_eq!(grid.set_elevation(99, 1), Err(HexMapError::CellNotFound(99)));
        assert_eq!(grid.add_road(99, HexDirection::E), Err(HexMapError::CellNotFound(99)));
    }

    #[test]
    fn test_set_elevation_moves_cell() {
        let mut grid = grid(1, 1);
        grid.set_elevation(4, 3).unwrap();
        assert_eq!(grid.cell(4).unwrap().position.y, 15.0);
    }

    #[test]
    fn test_river_links_both_cells() {
        let mut grid = grid(1, 1);
        grid.set_outgoing_river(4, HexDirection::E).unwrap();
        assert_eq!(grid.cell(4).unwrap().outgoing_river, Some(HexDirection::E));
        assert_eq!(grid.cell(5).unwrap().incoming_river, Some(HexDirection::W));

        // redirecting drops the old destination's incoming river
        grid.set_outgoing_river(4, HexDirection::W).unwrap();
        assert_eq!(grid.cell(5).unwrap().incoming_river, None);
        assert_eq!(grid.cell(3).unwrap().incoming_river, Some(HexDirection::E));

        grid.remove_river(4).unwrap();
        assert!(!grid.cell(4).unwrap().has_river());
        assert!(!grid.cell(3).unwrap().has_river());
    }

    #[test]
    fn test_river_cannot_flow_uphill() {
        let mut grid = grid(1, 1);
        grid.set_elevation(5, 1).unwrap();
        assert!(matches!(
            grid.try_set_outgoing_river(4, HexDirection::E),
            Err(HexMapError::InvalidRiver { .. })
        ));
        grid.set_outgoing_river(4, HexDirection::E).unwrap();
        assert!(!grid.cell(4).unwrap().has_river());

        // a lake at the destination's height lets the river out
        grid.set_water_level(4, 1).unwrap();
        grid.try_set_outgoing_river(4, HexDirection::E).unwrap();
    }

    #[test]
    fn test_raising_destination_removes_river() {
        let mut grid = grid(1, 1);
        grid.set_outgoing_river(4, HexDirection::E).unwrap();
        grid.set_elevation(5, 2).unwrap();
        assert!(!grid.cell(4).unwrap().has_river());
        assert!(!grid.cell(5).unwrap().has_river());
    }

    #[test]
    fn test_river_replaces_road() {
        let mut grid = grid(1, 1);
        grid.add_road(4, HexDirection::E).unwrap();
        assert!(grid.cell(5).unwrap().has_road_through_edge(HexDirection::W));
        grid.set_outgoing_river(4, HexDirection::E).unwrap();
        assert!(!grid.cell(4).unwrap().has_roads());
        assert!(!grid.cell(5).unwrap().has_roads());
    }

    #[test]
    fn test_roads_avoid_cliffs() {
        let mut grid = grid(1, 1);
        grid.set_elevation(5, 2).unwrap();
        assert!(matches!(
            grid.try_add_road(4, HexDirection::E),
            Err(HexMapError::InvalidRoad { .. })
        ));

        grid.set_elevation(5, 1).unwrap();
        grid.try_add_road(4, HexDirection::E).unwrap();
        grid.set_elevation(5, 3).unwrap();
        assert!(!grid.cell(4).unwrap().has_roads());
    }

    #[test]
    fn test_remove_roads() {
        let mut grid = grid(1, 1);
        grid.add_road(4, HexDirection::E).unwrap();
        grid.add_road(4, HexDirection::NW).unwrap();
        grid.remove_roads(4).unwrap();
        assert!(grid.cells().iter().all(|c| !c.has_roads()));
    }

    #[test]
    fn test_dirty_chunks() {
        let mut grid = grid(2, 1);
        assert_eq!(grid.take_dirty_chunks(), vec![0, 1]);
        assert!(grid.take_dirty_chunks().is_empty());

        // interior of chunk 0
        grid.set_elevation(7, 1).unwrap();
        assert_eq!(grid.take_dirty_chunks(), vec![0]);

        // chunk 0 cell bordering chunk 1
        grid.set_color(8, Vec4::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        assert_eq!(grid.take_dirty_chunks(), vec![0, 1]);

        // urban level only touches the own chunk
        grid.set_urban_level(8, 2).unwrap();
        assert_eq!(grid.take_dirty_chunks(), vec![0]);
        assert!(!grid.is_chunk_dirty(0));
    }

    #[test]
    fn test_urban_level_is_clamped() {
        let mut grid = grid(1, 1);
        grid.set_urban_level(0, 9).unwrap();
        assert_eq!(grid.cell(0).unwrap().urban_level, 3);
    }
}
