mod common;

use cgmath::{Point3, Vector3};
use common::test_utils::{opaque_bundle, transparent_bundle};
use showroom::{
    data_structures::scene::Scene,
    lod::QualityLevel,
    render::{FrameState, Pass, build_pass},
    resources::AssetStore,
};

fn frame(sorting: bool) -> FrameState {
    FrameState {
        camera_position: Point3::new(0.0, 0.0, 0.0),
        light_position: Point3::new(0.0, 8.0, 0.0),
        quality: QualityLevel::Auto,
        sorting,
    }
}

#[test]
fn should_sort_instances_ascending_by_distance() {
    let mut store = AssetStore::new();
    let h = store.insert(transparent_bundle());

    let mut scene = Scene::new();
    for z in [-50.0, -5.0, -20.0] {
        scene.push(
            &store,
            [h, h, h],
            Vector3::new(0.0, 0.0, z),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
    }

    scene.update_distances(Point3::new(0.0, 0.0, 0.0));
    scene.sort_by_distance();

    let distances: Vec<f32> = scene
        .instances()
        .iter()
        .map(|i| i.distance_to_camera())
        .collect();
    assert_eq!(distances, vec![5.0, 20.0, 50.0]);
}

#[test]
fn should_leave_an_already_sorted_scene_unchanged() {
    let mut store = AssetStore::new();
    let h = store.insert(transparent_bundle());

    let mut scene = Scene::new();
    for z in [-10.0, -20.0, -30.0] {
        scene.push(
            &store,
            [h, h, h],
            Vector3::new(0.0, 0.0, z),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
    }

    scene.update_distances(Point3::new(0.0, 0.0, 0.0));
    scene.sort_by_distance();
    let first: Vec<f32> = scene
        .instances()
        .iter()
        .map(|i| i.distance_to_camera())
        .collect();

    scene.sort_by_distance();
    let second: Vec<f32> = scene
        .instances()
        .iter()
        .map(|i| i.distance_to_camera())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn should_draw_transparent_instances_farthest_first() {
    let mut store = AssetStore::new();
    let h = store.insert(transparent_bundle());

    let mut scene = Scene::new();
    for z in [-5.0, -50.0, -20.0] {
        scene.push(
            &store,
            [h, h, h],
            Vector3::new(0.0, 0.0, z),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
    }

    scene.update_distances(Point3::new(0.0, 0.0, 0.0));
    scene.sort_by_distance();

    let items = build_pass(&scene, &store, &frame(true), Pass::Transparent);
    // Scale is 1 and yaw is 0, so the matrix's fourth column holds the
    // instance position directly.
    let zs: Vec<f32> = items.iter().map(|item| item.model[3].z).collect();
    assert_eq!(zs, vec![-50.0, -20.0, -5.0]);
}

#[test]
fn should_reverse_the_held_order_when_sorting_is_disabled() {
    let mut store = AssetStore::new();
    let h = store.insert(transparent_bundle());

    let mut scene = Scene::new();
    for z in [-5.0, -50.0, -20.0] {
        scene.push(
            &store,
            [h, h, h],
            Vector3::new(0.0, 0.0, z),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
    }
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    // No sort: the transparent pass still walks the scene back to front in
    // whatever order it currently holds.
    let items = build_pass(&scene, &store, &frame(false), Pass::Transparent);
    let zs: Vec<f32> = items.iter().map(|item| item.model[3].z).collect();
    assert_eq!(zs, vec![-20.0, -50.0, -5.0]);
}

#[test]
#[should_panic]
fn should_reject_handles_from_a_bigger_store() {
    let mut big = AssetStore::new();
    let _ = big.insert(opaque_bundle());
    let dangling = big.insert(opaque_bundle());

    let mut small = AssetStore::new();
    let _ = small.insert(opaque_bundle());

    let mut scene = Scene::new();
    scene.push(
        &small,
        [dangling, dangling, dangling],
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
}
