//! The Asset Store: OBJ/MTL loading and GPU upload.
//!
//! Loading is CPU-only (parse + image decode) so it can run before a window
//! or device exists; [`upload_bundle`] turns a loaded [`MeshBundle`] into GPU
//! buffers and per-material texture bind groups once the context is up.
//!
//! A failure to parse the base geometry file is fatal: the scene cannot
//! render without its declared assets, so the loader emits a diagnostic and
//! terminates the process. Material-library problems and unreadable texture
//! files only produce warnings.

use std::path::Path;

use wgpu::util::DeviceExt;

use crate::data_structures::{
    model::{GpuBundle, GpuMaterial, GpuMesh, Material, MeshBundle, ModelVertex, Submesh},
    scene::BundleHandle,
    texture::Texture,
};

/// Owns every loaded bundle for the lifetime of the process.
///
/// Scene instances reference bundles through [`BundleHandle`]s; nothing is
/// ever removed, so handles stay valid forever.
#[derive(Debug, Default)]
pub struct AssetStore {
    bundles: Vec<MeshBundle>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn bundle(&self, handle: BundleHandle) -> &MeshBundle {
        &self.bundles[handle.0]
    }

    pub fn bundles(&self) -> &[MeshBundle] {
        &self.bundles
    }

    /// Add an already-built bundle, validating its material indices.
    pub fn insert(&mut self, bundle: MeshBundle) -> BundleHandle {
        bundle.validate();
        self.bundles.push(bundle);
        BundleHandle(self.bundles.len() - 1)
    }

    /// Load a Wavefront OBJ (plus its MTL and textures) into the store.
    ///
    /// Terminates the process when the geometry file cannot be parsed;
    /// there is no recovery path for a scene missing its declared assets.
    pub fn load_obj(&mut self, path: &Path) -> BundleHandle {
        match load_bundle(path) {
            Ok(bundle) => self.insert(bundle),
            Err(e) => {
                log::error!("failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }
}

fn load_bundle(path: &Path) -> anyhow::Result<MeshBundle> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    // An unparsable material library degrades the render but the geometry is
    // still usable, so this stays a warning.
    let materials = match materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!(
                "material library for {} could not be loaded: {}",
                path.display(),
                e
            );
            Vec::new()
        }
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut materials: Vec<Material> = materials
        .into_iter()
        .map(|m| to_material(m, base_dir))
        .collect();

    let submeshes: Vec<Submesh> = models
        .into_iter()
        .map(|m| Submesh {
            material_id: m.mesh.material_id.unwrap_or(0),
            positions: m.mesh.positions,
            normals: m.mesh.normals,
            texcoords: m.mesh.texcoords,
            indices: m.mesh.indices,
        })
        .collect();

    // Pad with defaults so every material_id is in range; render-time index
    // checks are not an option.
    let max_id = submeshes.iter().map(|s| s.material_id).max().unwrap_or(0);
    while materials.len() <= max_id {
        materials.push(Material::default());
    }

    Ok(MeshBundle {
        submeshes,
        materials,
    })
}

fn to_material(m: tobj::Material, base_dir: &Path) -> Material {
    let diffuse_texture = m
        .diffuse_texture
        .as_ref()
        .map(|t| base_dir.join(t).to_string_lossy().into_owned());
    let image = diffuse_texture.as_deref().and_then(load_image);

    Material {
        diffuse: m.diffuse.unwrap_or([1.0, 1.0, 1.0]),
        specular: m.specular.unwrap_or([0.0, 0.0, 0.0]),
        // tobj leaves Ke in the unknown-parameter map.
        emission: m
            .unknown_param
            .get("Ke")
            .and_then(|v| parse_color(v))
            .unwrap_or([0.0, 0.0, 0.0]),
        shininess: m.shininess.unwrap_or(0.0),
        dissolve: m.dissolve.unwrap_or(1.0),
        name: m.name,
        diffuse_texture,
        image,
    }
}

fn parse_color(value: &str) -> Option<[f32; 3]> {
    let mut parts = value.split_whitespace().map(str::parse::<f32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) => Some([r, g, b]),
        _ => None,
    }
}

fn load_image(path: &str) -> Option<image::RgbaImage> {
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            log::warn!("could not decode texture {}: {}", path, e);
            None
        }
    }
}

/// Bind group layout for the per-material diffuse texture.
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Material texture_bind_group_layout"),
    })
}

/// Create GPU buffers and texture bind groups for one bundle.
///
/// The resulting `materials` sequence parallels the bundle's: one texture
/// handle per material, a white placeholder where no texture was decoded.
pub fn upload_bundle(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    bundle: &MeshBundle,
) -> GpuBundle {
    let meshes = bundle
        .submeshes
        .iter()
        .map(|submesh| {
            let vertices = (0..submesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        submesh.positions[i * 3],
                        submesh.positions[i * 3 + 1],
                        submesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        submesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - submesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        submesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        submesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        submesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Bundle Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Bundle Index Buffer"),
                contents: bytemuck::cast_slice(&submesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            GpuMesh {
                vertex_buffer,
                index_buffer,
                num_elements: submesh.indices.len() as u32,
            }
        })
        .collect();

    let materials: Vec<GpuMaterial> = bundle
        .materials
        .iter()
        .map(|material| {
            let texture = match &material.image {
                Some(img) => Texture::from_image(device, queue, img, Some(&material.name)),
                None => Texture::placeholder(device, queue),
            };
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(
                            texture.sampler.as_ref().expect("scene textures are sampled"),
                        ),
                    },
                ],
                label: Some(&material.name),
            });
            GpuMaterial {
                texture,
                bind_group,
            }
        })
        .collect();

    // One texture handle per material, same indexing as the CPU side.
    assert_eq!(materials.len(), bundle.materials.len());

    GpuBundle { meshes, materials }
}
