use showroom::data_structures::model::{Material, MeshBundle, Submesh};

/// A bundle with one triangle submesh per listed dissolve value, each wired
/// to its own material.
pub fn bundle_with_dissolves(dissolves: &[f32]) -> MeshBundle {
    MeshBundle {
        submeshes: (0..dissolves.len())
            .map(|i| Submesh {
                positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                texcoords: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                indices: vec![0, 1, 2],
                material_id: i,
            })
            .collect(),
        materials: dissolves
            .iter()
            .map(|dissolve| Material {
                dissolve: *dissolve,
                ..Default::default()
            })
            .collect(),
    }
}

/// A fully opaque single-submesh bundle.
pub fn opaque_bundle() -> MeshBundle {
    bundle_with_dissolves(&[1.0])
}

/// A single-submesh bundle whose material is transparent.
pub fn transparent_bundle() -> MeshBundle {
    bundle_with_dissolves(&[0.5])
}
