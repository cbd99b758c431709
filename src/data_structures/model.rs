//! Mesh and material definitions plus their GPU-side counterparts.
//!
//! A [`MeshBundle`] is everything one asset file contributes: a sequence of
//! submeshes, a sequence of materials and (after decoding) the texture images
//! the materials reference. Bundles are immutable after loading and owned by
//! the [`crate::resources::AssetStore`] for the lifetime of the process; scene
//! instances refer to them through handles, never by ownership.

use crate::data_structures::texture::Texture;

/// One drawable piece of a bundle: vertex arrays, a triangle index list and
/// the index of the material it is rendered with.
///
/// Arrays are flat (`x y z x y z ...` for positions/normals, `u v u v ...`
/// for texcoords) exactly as the OBJ loader produces them. Normals and
/// texcoords may be shorter than the position array when the source file
/// omits them; missing components are treated as zero at upload time.
#[derive(Clone, Debug, Default)]
pub struct Submesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub indices: Vec<u32>,
    /// Index into the owning bundle's material sequence. One material per
    /// submesh; when the source file lists several, the first one wins.
    pub material_id: usize,
}

/// Fixed-function style material state as read from the MTL file.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    /// Opacity; 1.0 is fully opaque, anything below routes the submesh into
    /// the transparent pass.
    pub dissolve: f32,
    /// Diffuse texture path, already resolved against the OBJ's directory.
    pub diffuse_texture: Option<String>,
    /// Decoded texture image, present when `diffuse_texture` could be read.
    pub image: Option<image::RgbaImage>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse: [1.0, 1.0, 1.0],
            specular: [0.0, 0.0, 0.0],
            emission: [0.0, 0.0, 0.0],
            shininess: 0.0,
            dissolve: 1.0,
            diffuse_texture: None,
            image: None,
        }
    }
}

/// One loaded asset file: submeshes plus the materials they index into.
///
/// Invariant: every submesh's `material_id` is in range for `materials`.
/// [`MeshBundle::validate`] is called by the asset store after parsing so the
/// render path never has to bounds-check.
#[derive(Clone, Debug, Default)]
pub struct MeshBundle {
    pub submeshes: Vec<Submesh>,
    pub materials: Vec<Material>,
}

impl MeshBundle {
    /// Panics when a submesh references a material that does not exist.
    /// Malformed indices are a programming error, not a runtime condition.
    pub fn validate(&self) {
        for (i, submesh) in self.submeshes.iter().enumerate() {
            assert!(
                submesh.material_id < self.materials.len(),
                "submesh {} references material {} but the bundle only has {}",
                i,
                submesh.material_id,
                self.materials.len()
            );
        }
    }
}

/// Types that can describe their vertex buffer layout to a pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// The per-vertex data stored in GPU vertex buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// GPU buffers for one submesh.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

/// GPU texture binding for one material. Untextured materials get a white
/// placeholder so a single pipeline serves every submesh.
pub struct GpuMaterial {
    #[allow(unused)]
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

/// GPU-side counterpart of a [`MeshBundle`].
///
/// Invariant: `materials.len()` equals the source bundle's material count, so
/// a submesh's `material_id` indexes both sequences.
pub struct GpuBundle {
    pub meshes: Vec<GpuMesh>,
    pub materials: Vec<GpuMaterial>,
}
