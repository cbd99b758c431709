//! The per-frame render pass engine.
//!
//! Rendering is split in two steps so the pass logic stays testable without
//! a graphics context:
//!
//! 1. [`build_pass`] walks the scene and produces [`DrawItem`]s for one pass:
//!    it resolves the LOD slot from the cached camera distance, partitions
//!    submeshes by material opacity, composes the instance transform and
//!    snapshots the material state.
//! 2. [`draw_items`] walks the items against the GPU bundles inside an open
//!    render pass, binding the submesh's texture and drawing the indexed
//!    triangle list with the per-draw payload fed through an instance buffer.
//!
//! All frame-varying inputs arrive in an explicit [`FrameState`] value
//! instead of being mutated in place on the engine.

use cgmath::{Deg, Matrix4, Point3};

use crate::{
    data_structures::{
        model::{GpuBundle, Vertex},
        scene::{Instance, Scene},
    },
    lod::{self, QualityLevel},
    resources::AssetStore,
};

/// Which of the two per-frame passes is being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Opaque,
    Transparent,
}

/// Everything the pass engine needs for one frame, passed by value.
#[derive(Clone, Copy, Debug)]
pub struct FrameState {
    pub camera_position: Point3<f32>,
    pub light_position: Point3<f32>,
    pub quality: QualityLevel,
    pub sorting: bool,
}

/// Material state as it goes to the GPU for one draw.
///
/// Ambient is intentionally absent: the ambient contribution is globally
/// forced to black, for the light as well as for every material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialState {
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emission: [f32; 3],
    /// Already clamped to `[0, 128]`.
    pub shininess: f32,
    pub dissolve: f32,
}

/// Clamp shininess to the range the fixed-function model accepts.
pub fn clamp_shininess(shininess: f32) -> f32 {
    shininess.clamp(0.0, 128.0)
}

/// Compose the instance transform: scale, then translation, then yaw.
///
/// `M = S * T * R` matches the legacy matrix stack where the last applied
/// transform affects the geometry first, so the translation is expressed in
/// scaled units.
pub fn instance_matrix(instance: &Instance) -> Matrix4<f32> {
    Matrix4::from_scale(instance.scale)
        * Matrix4::from_translation(instance.position)
        * Matrix4::from_angle_y(Deg(instance.rotation.y))
}

/// One submesh draw resolved for the current frame.
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub bundle: usize,
    pub submesh: usize,
    pub material: usize,
    pub model: Matrix4<f32>,
    pub state: MaterialState,
}

impl DrawItem {
    pub fn to_raw(&self) -> DrawRaw {
        DrawRaw {
            model: self.model.into(),
            diffuse: [
                self.state.diffuse[0],
                self.state.diffuse[1],
                self.state.diffuse[2],
                self.state.dissolve,
            ],
            specular: [
                self.state.specular[0],
                self.state.specular[1],
                self.state.specular[2],
                self.state.shininess,
            ],
            emission: [
                self.state.emission[0],
                self.state.emission[1],
                self.state.emission[2],
                0.0,
            ],
        }
    }
}

/// Build the draw list for one pass.
///
/// Opaque items come out in scene order; transparent items in reverse scene
/// order, so that after an ascending distance sort the farthest instance is
/// drawn first. A submesh lands in exactly one of the two passes: opaque when
/// its material's dissolve is >= 1.0, transparent otherwise.
pub fn build_pass(
    scene: &Scene,
    store: &AssetStore,
    frame: &FrameState,
    pass: Pass,
) -> Vec<DrawItem> {
    let mut items = Vec::new();

    let mut emit = |instance: &Instance| {
        let slot = lod::select(instance.distance_to_camera(), frame.quality);
        let handle = instance.lod[slot];
        let bundle = store.bundle(handle);
        let model = instance_matrix(instance);

        for (submesh_idx, submesh) in bundle.submeshes.iter().enumerate() {
            let material = &bundle.materials[submesh.material_id];

            let transparent = material.dissolve < 1.0;
            if transparent != (pass == Pass::Transparent) {
                continue;
            }

            items.push(DrawItem {
                bundle: handle.index(),
                submesh: submesh_idx,
                material: submesh.material_id,
                model,
                state: MaterialState {
                    diffuse: material.diffuse,
                    specular: material.specular,
                    emission: material.emission,
                    shininess: clamp_shininess(material.shininess),
                    dissolve: material.dissolve,
                },
            });
        }
    };

    match pass {
        Pass::Opaque => scene.instances().iter().for_each(&mut emit),
        Pass::Transparent => scene.instances().iter().rev().for_each(&mut emit),
    }

    items
}

/// The per-draw payload stored in the instanced vertex buffer.
///
/// Alpha-style extras ride in the fourth components: dissolve with the
/// diffuse color, clamped shininess with the specular color.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawRaw {
    model: [[f32; 4]; 4],
    diffuse: [f32; 4],
    specular: [f32; 4],
    emission: [f32; 4],
}

impl Vertex for DrawRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<DrawRaw>() as wgpu::BufferAddress,
            // One "instance" per draw item; the shader picks up the next
            // payload entry whenever the instance index advances.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 20]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 24]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Issue the draws for one pass.
///
/// `base` is the index of the first item's payload inside the shared per-frame
/// draw buffer (the transparent items follow the opaque ones). The caller has
/// already set the pipeline and the camera/light bind groups.
pub fn draw_items(
    render_pass: &mut wgpu::RenderPass<'_>,
    gpu: &[GpuBundle],
    items: &[DrawItem],
    base: u32,
) {
    for (i, item) in items.iter().enumerate() {
        let bundle = &gpu[item.bundle];
        let mesh = &bundle.meshes[item.submesh];
        let material = &bundle.materials[item.material];

        render_pass.set_bind_group(0, &material.bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        let instance = base + i as u32;
        render_pass.draw_indexed(0..mesh.num_elements, 0, instance..instance + 1);
    }
}
