//! Error types for hex map configuration and grid editing
//!
//! The triangulation core itself never fails; these errors only surface at the
//! configuration and editing boundary.

use thiserror::Error;

use crate::direction::HexDirection;

/// Errors that can occur while configuring or editing a hex map
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HexMapError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Requested cell index does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),

    /// Requested chunk index does not exist
    #[error("chunk not found: {0}")]
    ChunkNotFound(usize),

    /// A river cannot flow from `cell` toward `direction`
    #[error("invalid river from cell {cell} toward {direction:?}: {reason}")]
    InvalidRiver {
        cell: usize,
        direction: HexDirection,
        reason: &'static str,
    },

    /// A road cannot be placed across the edge of `cell` in `direction`
    #[error("invalid road from cell {cell} toward {direction:?}: {reason}")]
    InvalidRoad {
        cell: usize,
        direction: HexDirection,
        reason: &'static str,
    },
}

/// Result type alias for hex map operations
pub type Result<T> = std::result::Result<T, HexMapError>;
