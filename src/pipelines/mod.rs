//! Render pipeline construction.
//!
//! Two pipelines share one shader and vertex layout; they differ only in
//! blend state. `basic` replaces the framebuffer color, `transparent` blends
//! with the source-alpha / one-minus-destination-alpha pair.

pub mod basic;
pub mod transparent;

use crate::pipelines::{basic::mk_basic_pipeline, transparent::mk_transparent_pipeline};

/// The pipelines owned by the context, built once at startup.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: mk_basic_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            transparent: mk_transparent_pipeline(
                device,
                config,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
        }
    }
}
