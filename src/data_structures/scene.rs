//! The scene: placed instances referencing asset bundles through handles.
//!
//! Instances never own mesh data. They carry a [`BundleHandle`] per detail
//! level into the asset store, which outlives the scene for the whole
//! process. Handles are validated when an instance is pushed, so the render
//! path can index the store without further checks.

use std::cmp::Ordering;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::resources::AssetStore;

/// Index of a loaded bundle inside the [`AssetStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BundleHandle(pub(crate) usize);

impl BundleHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One placed object: three LOD slots (index 0 = lowest detail, 2 = highest),
/// a transform and the camera distance cached for sorting and LOD selection.
#[derive(Clone, Debug)]
pub struct Instance {
    pub lod: [BundleHandle; 3],
    pub position: Vector3<f32>,
    /// Euler angles in degrees; only the Y component (yaw) is applied.
    pub rotation: Vector3<f32>,
    pub scale: f32,
    distance: f32,
}

impl Instance {
    /// Camera distance as of the last [`Scene::update_distances`] call.
    pub fn distance_to_camera(&self) -> f32 {
        self.distance
    }
}

/// Ascending camera-distance comparator for transparent sorting.
///
/// `total_cmp` gives a total order, so ties (and any NaN that would slip in)
/// resolve consistently rather than aborting the sort.
pub fn by_distance(a: &Instance, b: &Instance) -> Ordering {
    a.distance.total_cmp(&b.distance)
}

/// An ordered sequence of instances. Order is irrelevant for the opaque pass
/// but becomes the sort domain for the transparent pass.
#[derive(Debug, Default)]
pub struct Scene {
    instances: Vec<Instance>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance built from three bundle handles and a transform.
    ///
    /// Panics when a handle does not point into `store`; scene construction
    /// is the only place where dangling references could enter the system.
    pub fn push(
        &mut self,
        store: &AssetStore,
        lod: [BundleHandle; 3],
        position: Vector3<f32>,
        rotation: Vector3<f32>,
        scale: f32,
    ) {
        for handle in &lod {
            assert!(
                handle.0 < store.len(),
                "bundle handle {} out of range ({} bundles loaded)",
                handle.0,
                store.len()
            );
        }
        self.instances.push(Instance {
            lod,
            position,
            rotation,
            scale,
            distance: 0.0,
        });
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Recompute every instance's straight-line distance to the camera.
    ///
    /// Distance is taken to the instance position, not per submesh, so the
    /// transparency sort granularity is per instance.
    pub fn update_distances(&mut self, camera: Point3<f32>) {
        let camera = Vector3::new(camera.x, camera.y, camera.z);
        for instance in &mut self.instances {
            instance.distance = (camera - instance.position).magnitude();
        }
    }

    /// Sort instances ascending by cached camera distance.
    pub fn sort_by_distance(&mut self) {
        self.instances.sort_by(by_distance);
    }
}

/// Floor placement for one exhibit pad: where the rows start, how they are
/// oriented and scaled, and how the two-column grid is spaced.
struct ExhibitPlacement {
    origin: [f32; 3],
    yaw: f32,
    scale: f32,
    rows: usize,
    pair_offset: f32,
    row_step: f32,
}

// The showroom floor has two exhibit pads.
const EXHIBIT_PLACEMENTS: [ExhibitPlacement; 2] = [
    ExhibitPlacement {
        origin: [2.3, 1.3, -44.0],
        yaw: 0.0,
        scale: 1.0,
        rows: 6,
        pair_offset: 15.0,
        row_step: 12.0,
    },
    ExhibitPlacement {
        origin: [-10.0, 0.0, -40.0],
        yaw: 90.0,
        scale: 0.8,
        rows: 4,
        pair_offset: 20.0,
        row_step: 25.0,
    },
];

/// Compose the showroom scene from loaded bundles.
///
/// The first bundle is the room itself: it has no coarser variants, so every
/// LOD slot aliases it, placed untransformed at the origin. Each following
/// triple (lowest, mid, highest detail) is one exhibit laid out as two
/// columns of rows on its pad; further triples reuse the pads shifted
/// sideways. Trailing bundles that do not form a triple are ignored with a
/// warning.
pub fn compose_showroom(store: &AssetStore, handles: &[BundleHandle]) -> Scene {
    assert!(!handles.is_empty(), "the showroom needs at least the room");

    let mut scene = Scene::new();

    let room = handles[0];
    scene.push(
        store,
        [room, room, room],
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );

    let leftover = (handles.len() - 1) % 3;
    if leftover != 0 {
        log::warn!(
            "{} trailing asset file(s) do not form a LOD triple and are ignored",
            leftover
        );
    }

    for (exhibit, lod) in handles[1..].chunks_exact(3).enumerate() {
        let lod = [lod[0], lod[1], lod[2]];
        let placement = &EXHIBIT_PLACEMENTS[exhibit % EXHIBIT_PLACEMENTS.len()];
        let shift = (exhibit / EXHIBIT_PLACEMENTS.len()) as f32 * -50.0;

        let rotation = Vector3::new(0.0, placement.yaw, 0.0);
        let mut position = Vector3::new(
            placement.origin[0] + shift,
            placement.origin[1],
            placement.origin[2],
        );
        for _ in 0..placement.rows {
            scene.push(store, lod, position, rotation, placement.scale);
            position.x += placement.pair_offset;
            scene.push(store, lod, position, rotation, placement.scale);
            position.x -= placement.pair_offset;

            position.z += placement.row_step;
        }
    }

    scene
}
