mod common;

use cgmath::Vector3;
use common::test_utils::opaque_bundle;
use showroom::{
    data_structures::scene::{BundleHandle, Scene, compose_showroom},
    resources::AssetStore,
};

fn store_with(n: usize) -> (AssetStore, Vec<BundleHandle>) {
    let mut store = AssetStore::new();
    let handles = (0..n).map(|_| store.insert(opaque_bundle())).collect();
    (store, handles)
}

fn positions(scene: &Scene) -> Vec<Vector3<f32>> {
    scene.instances().iter().map(|i| i.position).collect()
}

#[test]
fn should_place_the_room_at_the_origin_in_every_slot() {
    let (store, handles) = store_with(1);

    let scene = compose_showroom(&store, &handles);

    assert_eq!(scene.len(), 1);
    let room = &scene.instances()[0];
    assert_eq!(room.lod, [handles[0]; 3]);
    assert_eq!(room.position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(room.rotation, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(room.scale, 1.0);
}

#[test]
fn should_lay_out_the_first_exhibit_as_six_paired_rows() {
    let (store, handles) = store_with(4);

    let scene = compose_showroom(&store, &handles);

    // Room plus six rows of two.
    assert_eq!(scene.len(), 13);
    let exhibit = &scene.instances()[1..];
    assert!(exhibit.iter().all(|i| i.scale == 1.0));
    assert!(exhibit.iter().all(|i| i.rotation.y == 0.0));
    assert!(exhibit.iter().all(|i| i.lod == [handles[1], handles[2], handles[3]]));

    assert_eq!(exhibit[0].position, Vector3::new(2.3, 1.3, -44.0));
    assert_eq!(exhibit[1].position, Vector3::new(17.3, 1.3, -44.0));
    assert_eq!(exhibit[2].position, Vector3::new(2.3, 1.3, -32.0));
    assert_eq!(exhibit[11].position, Vector3::new(17.3, 1.3, 16.0));
}

#[test]
fn should_lay_out_the_second_exhibit_scaled_and_rotated() {
    let (store, handles) = store_with(7);

    let scene = compose_showroom(&store, &handles);

    // Room, 12 instances of the first exhibit, 8 of the second.
    assert_eq!(scene.len(), 21);
    let exhibit = &scene.instances()[13..];
    assert_eq!(exhibit.len(), 8);
    assert!(exhibit.iter().all(|i| i.scale == 0.8));
    assert!(exhibit.iter().all(|i| i.rotation.y == 90.0));
    assert!(exhibit.iter().all(|i| i.lod == [handles[4], handles[5], handles[6]]));

    assert_eq!(exhibit[0].position, Vector3::new(-10.0, 0.0, -40.0));
    assert_eq!(exhibit[1].position, Vector3::new(10.0, 0.0, -40.0));
    // Rows step 25 deep: -40, -15, 10, 35.
    assert_eq!(exhibit[6].position, Vector3::new(-10.0, 0.0, 35.0));
    assert_eq!(exhibit[7].position, Vector3::new(10.0, 0.0, 35.0));
}

#[test]
fn should_ignore_trailing_files_that_do_not_form_a_triple() {
    let (store, handles) = store_with(6);

    let scene = compose_showroom(&store, &handles);

    // One complete triple; the two leftovers place nothing.
    assert_eq!(scene.len(), 13);
}

#[test]
fn should_shift_extra_exhibits_onto_fresh_floor_space() {
    let (store, handles) = store_with(10);

    let scene = compose_showroom(&store, &handles);

    assert_eq!(scene.len(), 33);
    // The third exhibit reuses the first pad's layout, shifted sideways.
    let exhibit = &scene.instances()[21..];
    assert_eq!(exhibit.len(), 12);
    assert_eq!(exhibit[0].position, Vector3::new(2.3 - 50.0, 1.3, -44.0));
    assert!(exhibit.iter().all(|i| i.scale == 1.0));
}
