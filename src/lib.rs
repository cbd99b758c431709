//! showroom
//!
//! A fixed-scene 3D viewer: a handful of textured OBJ models are loaded once,
//! arranged into a static scene, and rendered every frame from a free first
//! person camera. Each placed instance carries three detail variants and the
//! viewer picks one per frame based on camera distance. Rendering happens in
//! two passes: opaque submeshes in scene order, then transparent submeshes
//! back to front after an explicit distance sort.
//!
//! High-level modules
//! - `app`: the winit event loop driving input, passes and presentation
//! - `camera`: camera state, projection and the first person controller
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: mesh bundles, scene instances and GPU textures
//! - `lod`: quality levels and distance based detail selection
//! - `pipelines`: the opaque and transparent render pipelines
//! - `render`: per-frame draw batching and submission
//! - `resources`: the asset store loading OBJ/MTL files and uploading them
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod lod;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;
