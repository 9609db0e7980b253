//! # Error Module
//!
//! Errors surfaced by world construction and streaming. Configuration and
//! texture problems are fatal at startup; failures inside a load pass are
//! reported per coordinate and never abort the rest of the pass.

use thiserror::Error;

use crate::engine_state::{rendering::texture::TextureSide, voxels::block::block_type::Material};

/// Every failure the voxel world can report.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A material has no texture bound for one of its sides.
    #[error("no `{side:?}` texture registered for material `{material:?}`")]
    MissingTexture {
        /// The material that could not be resolved.
        material: Material,
        /// The texture side that is missing.
        side: TextureSide,
    },

    /// The external texture loader rejected a texture.
    #[error("texture `{path}` could not be loaded: {reason}")]
    Texture {
        /// Path listed in the manifest.
        path: String,
        /// Reason reported by the loader.
        reason: String,
    },

    /// The texture manifest names something this engine does not know.
    #[error("invalid texture manifest: {0}")]
    Manifest(String),

    /// A configuration value is out of its allowed range.
    #[error("invalid world configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// JSON input could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A chunk coordinate whose block origin does not fit in `i32`.
    #[error("chunk coordinate ({x}, {z}) is outside the addressable world")]
    CoordinateOutOfRange {
        /// Chunk X coordinate.
        x: i32,
        /// Chunk Z coordinate.
        z: i32,
    },

    /// A worker task panicked while running.
    #[error("task `{task}` panicked: {reason}")]
    TaskPanicked {
        /// Description of the task that panicked.
        task: String,
        /// Panic payload, if it was a string.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WorldError>;
