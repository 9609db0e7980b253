//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. They run on
//! the scoped worker burst of a load pass and never touch GPU state.

pub mod chunk_generation_task;
