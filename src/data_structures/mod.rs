//! Engine data structures: mesh bundles, textures and the scene.
//!
//! - `model` contains the CPU-side mesh/material records and GPU vertex types
//! - `scene` holds placed instances with their LOD slots and transforms
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod model;
pub mod scene;
pub mod texture;
