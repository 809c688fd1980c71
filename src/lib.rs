//! Hexagonal map triangulation
//!
//! A standalone library that turns a grid of hexagon cells into render-ready
//! meshes: terraced terrain, river channels, roads, lakes with shores and
//! estuaries. Output is engine-agnostic vertex data, suitable for Bevy, Godot,
//! wgpu or anything else.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_hex_map::*;
//!
//! let config = HexMapConfigBuilder::new()
//!     .seed(42)
//!     .map_size(MapSize::Small)
//!     .build().unwrap();
//!
//! // Edit the map
//! let mut grid = HexGrid::new(config).unwrap();
//! grid.set_elevation(22, 2).unwrap();
//! grid.set_outgoing_river(22, HexDirection::E).unwrap();
//! grid.add_road(22, HexDirection::W).unwrap();
//!
//! // Generate meshes for the chunks that changed
//! let mesher = HexMapMesher::new();
//! for (chunk, data) in mesher.rebuild_dirty(&mut grid).unwrap() {
//!     println!("chunk {}: {} triangles", chunk, data.triangle_count());
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration, directions,
//!   coordinates and feature placements
//!
//! The library never installs a logger; it reports through the `log` facade.

// Modules
pub mod error;
pub mod config;
pub mod direction;
pub mod coordinates;
pub mod metrics;
pub mod edge;
pub mod noise;
pub mod cell;
pub mod mesh;
pub mod features;
pub mod triangulation;
pub mod grid;
pub mod mesher;

// Re-export core types for convenience
pub use error::{HexMapError, Result};
pub use config::{HexMapConfig, HexMapConfigBuilder, MapSize};
pub use direction::HexDirection;
pub use coordinates::HexCoordinates;
pub use metrics::{edge_type, HexEdgeType, HexMetrics, INNER_TO_OUTER, OUTER_TO_INNER};
pub use edge::EdgeVertices;
pub use noise::{HashGrid, HexHash, NoiseSource, PerlinConfig};
pub use cell::{CellGraph, HexCell, HexColor};
pub use mesh::{BufferPool, HexMesh, ListPool, MeshData, MeshLayout, Pooled};
pub use features::{FeatureInstance, FeatureManager};
pub use triangulation::{ChunkMeshData, ChunkMeshes, Triangulator};
pub use grid::HexGrid;
pub use mesher::HexMapMesher;

// Re-export glam vector types for convenience
pub use glam::{Vec2, Vec3, Vec4};
