//! Chunk mesh rebuilding
//!
//! [`HexMapMesher`] turns the cells of a [`HexGrid`] into [`ChunkMeshData`],
//! one chunk at a time. Rebuilding everything runs the chunks in parallel with
//! rayon; every worker triangulates into its own [`ChunkMeshes`] and all of
//! them share the mesher's [`BufferPool`].

use std::time::Instant;

use rayon::prelude::*;

use crate::error::Result;
use crate::grid::HexGrid;
use crate::mesh::BufferPool;
use crate::triangulation::{ChunkMeshData, ChunkMeshes, Triangulator};

/// Rebuilds chunk geometry on demand
///
/// # Example
///
/// ```
/// use rust_hex_map::*;
///
/// let config = HexMapConfigBuilder::new().seed(3).build().unwrap();
/// let mut grid = HexGrid::new(config).unwrap();
/// let mesher = HexMapMesher::new();
///
/// // first pass: every chunk is dirty
/// let chunks = mesher.rebuild_dirty(&mut grid).unwrap();
/// assert_eq!(chunks.len(), grid.chunk_count());
///
/// grid.set_elevation(0, 2).unwrap();
/// for (chunk, data) in mesher.rebuild_dirty(&mut grid).unwrap() {
///     println!("chunk {}: {} triangles", chunk, data.triangle_count());
/// }
/// ```
#[derive(Debug, Default)]
pub struct HexMapMesher {
    pool: BufferPool,
}

impl HexMapMesher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool working buffers are drawn from
    #[inline]
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Triangulate one chunk
    ///
    /// # Errors
    ///
    /// Returns `ChunkNotFound` if the chunk index is out of bounds
    pub fn rebuild(&self, grid: &HexGrid, chunk: usize) -> Result<ChunkMeshData> {
        let start = Instant::now();
        let cells = grid.cells_in_chunk(chunk)?;

        let mut meshes = ChunkMeshes::new();
        meshes.clear(&self.pool);
        Triangulator::new(grid, grid.metrics(), &mut meshes).triangulate(cells);
        let data = meshes.apply(&self.pool);

        log::debug!(
            "Rebuilt chunk {}: {} cells, {} vertices, {} triangles, {} features in {:?}",
            chunk,
            cells.len(),
            data.vertex_count(),
            data.triangle_count(),
            data.features.len(),
            start.elapsed()
        );
        Ok(data)
    }

    /// Triangulate every chunk in parallel, in chunk order
    pub fn rebuild_all(&self, grid: &HexGrid) -> Result<Vec<ChunkMeshData>> {
        let start = Instant::now();
        let chunks = (0..grid.chunk_count())
            .into_par_iter()
            .map(|chunk| self.rebuild(grid, chunk))
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Rebuilt {} chunks ({} triangles) in {:?}",
            chunks.len(),
            chunks.iter().map(ChunkMeshData::triangle_count).sum::<usize>(),
            start.elapsed()
        );
        Ok(chunks)
    }

    /// Triangulate the chunks edited since the last call
    ///
    /// Returns `(chunk index, mesh data)` pairs in ascending chunk order and
    /// clears the grid's dirty flags.
    pub fn rebuild_dirty(&self, grid: &mut HexGrid) -> Result<Vec<(usize, ChunkMeshData)>> {
        let dirty = grid.take_dirty_chunks();
        if dirty.is_empty() {
            return Ok(Vec::new());
        }

        let grid: &HexGrid = grid;
        dirty
            .into_par_iter()
            .map(|chunk| self.rebuild(grid, chunk).map(|data| (chunk, data)))
            .collect()
    }
}
