mod common;

use cgmath::{Matrix4, Point3, Transform, Vector3};
use common::test_utils::{bundle_with_dissolves, opaque_bundle};
use showroom::{
    data_structures::scene::Scene,
    lod::QualityLevel,
    render::{FrameState, Pass, build_pass, clamp_shininess, instance_matrix},
    resources::AssetStore,
};

fn frame(quality: QualityLevel) -> FrameState {
    FrameState {
        camera_position: Point3::new(0.0, 0.0, 0.0),
        light_position: Point3::new(0.0, 8.0, 0.0),
        quality,
        sorting: true,
    }
}

#[test]
fn should_route_each_submesh_into_exactly_one_pass() {
    let mut store = AssetStore::new();
    // One opaque and one transparent material in the same bundle.
    let h = store.insert(bundle_with_dissolves(&[1.0, 0.5]));

    let mut scene = Scene::new();
    scene.push(
        &store,
        [h, h, h],
        Vector3::new(0.0, 0.0, -10.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let opaque = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Opaque);
    let transparent = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Transparent);

    assert_eq!(opaque.len(), 1);
    assert_eq!(transparent.len(), 1);
    assert_eq!(opaque[0].material, 0);
    assert_eq!(transparent[0].material, 1);
}

#[test]
fn should_treat_a_dissolve_of_one_as_the_opaque_boundary() {
    let mut store = AssetStore::new();
    let h = store.insert(bundle_with_dissolves(&[1.0, 0.999, 1.5]));

    let mut scene = Scene::new();
    scene.push(
        &store,
        [h, h, h],
        Vector3::new(0.0, 0.0, -10.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let opaque = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Opaque);
    let transparent = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Transparent);

    let opaque_materials: Vec<usize> = opaque.iter().map(|i| i.material).collect();
    let transparent_materials: Vec<usize> = transparent.iter().map(|i| i.material).collect();
    assert_eq!(opaque_materials, vec![0, 2]);
    assert_eq!(transparent_materials, vec![1]);
}

#[test]
fn should_select_the_lod_slot_from_the_cached_distance() {
    let mut store = AssetStore::new();
    let low = store.insert(opaque_bundle());
    let mid = store.insert(opaque_bundle());
    let high = store.insert(opaque_bundle());

    let mut scene = Scene::new();
    // Distance 10: still the highest detail slot.
    scene.push(
        &store,
        [low, mid, high],
        Vector3::new(0.0, 0.0, -10.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let items = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Opaque);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].bundle, high.index());
}

#[test]
fn should_degrade_lod_just_past_the_far_threshold() {
    let mut store = AssetStore::new();
    let low = store.insert(opaque_bundle());
    let mid = store.insert(opaque_bundle());
    let high = store.insert(opaque_bundle());

    let mut scene = Scene::new();
    scene.push(
        &store,
        [low, mid, high],
        Vector3::new(0.0, 0.0, -30.0001),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.push(
        &store,
        [low, mid, high],
        Vector3::new(0.0, 0.0, -29.9),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let items = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Opaque);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].bundle, low.index());
    assert_eq!(items[1].bundle, mid.index());
}

#[test]
fn should_clamp_shininess_into_the_fixed_function_range() {
    assert_eq!(clamp_shininess(-5.0), 0.0);
    assert_eq!(clamp_shininess(0.0), 0.0);
    assert_eq!(clamp_shininess(64.0), 64.0);
    assert_eq!(clamp_shininess(128.0), 128.0);
    assert_eq!(clamp_shininess(400.0), 128.0);
}

#[test]
fn should_carry_clamped_material_state_into_the_draw_item() {
    let mut store = AssetStore::new();
    let mut bundle = opaque_bundle();
    bundle.materials[0].shininess = 400.0;
    bundle.materials[0].diffuse = [0.8, 0.1, 0.1];
    let h = store.insert(bundle);

    let mut scene = Scene::new();
    scene.push(
        &store,
        [h, h, h],
        Vector3::new(0.0, 0.0, -5.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let items = build_pass(&scene, &store, &frame(QualityLevel::Auto), Pass::Opaque);
    assert_eq!(items[0].state.shininess, 128.0);
    assert_eq!(items[0].state.diffuse, [0.8, 0.1, 0.1]);
    assert_eq!(items[0].state.dissolve, 1.0);
}

#[test]
fn should_compose_scale_then_translation_then_yaw() {
    let mut store = AssetStore::new();
    let h = store.insert(opaque_bundle());

    let mut scene = Scene::new();
    scene.push(
        &store,
        [h, h, h],
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(0.0, 90.0, 0.0),
        2.0,
    );

    let matrix = instance_matrix(&scene.instances()[0]);
    // A unit x vector: yaw 90 turns it to -z, translation moves it to
    // (1, 2, 2), the scale doubles everything last.
    let result = matrix.transform_point(Point3::new(1.0, 0.0, 0.0));
    let expected = Point3::new(2.0, 4.0, 4.0);
    assert!(
        (result.x - expected.x).abs() < 1e-4
            && (result.y - expected.y).abs() < 1e-4
            && (result.z - expected.z).abs() < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        result
    );

    // Same composition expressed as explicit factors.
    let explicit = Matrix4::from_scale(2.0)
        * Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0))
        * Matrix4::from_angle_y(cgmath::Deg(90.0));
    let reference = explicit.transform_point(Point3::new(1.0, 0.0, 0.0));
    assert!((result.x - reference.x).abs() < 1e-5);
    assert!((result.z - reference.z).abs() < 1e-5);
}

#[test]
fn should_use_fresh_distances_for_both_passes_after_the_camera_moves() {
    let mut store = AssetStore::new();
    let low = store.insert(bundle_with_dissolves(&[1.0, 0.5]));
    let mid = store.insert(bundle_with_dissolves(&[1.0, 0.5]));
    let high = store.insert(bundle_with_dissolves(&[1.0, 0.5]));

    let mut scene = Scene::new();
    scene.push(
        &store,
        [low, mid, high],
        Vector3::new(0.0, 0.0, -40.0),
        Vector3::new(0.0, 0.0, 0.0),
        1.0,
    );

    // Previous frame saw the instance up close, caching a short distance.
    scene.update_distances(Point3::new(0.0, 0.0, -30.0));

    // This frame the camera is back at the origin. The recompute runs
    // before either pass is built, so the instance's opaque and transparent
    // submeshes both come from the degraded slot.
    let frame = frame(QualityLevel::Auto);
    scene.update_distances(frame.camera_position);
    let opaque = build_pass(&scene, &store, &frame, Pass::Opaque);
    scene.sort_by_distance();
    let transparent = build_pass(&scene, &store, &frame, Pass::Transparent);

    assert_eq!(opaque.len(), 1);
    assert_eq!(transparent.len(), 1);
    assert_eq!(opaque[0].bundle, low.index());
    assert_eq!(transparent[0].bundle, low.index());
}

#[test]
fn should_pin_every_instance_to_the_fixed_quality_slot() {
    let mut store = AssetStore::new();
    let low = store.insert(opaque_bundle());
    let mid = store.insert(opaque_bundle());
    let high = store.insert(opaque_bundle());

    let mut scene = Scene::new();
    for z in [-1.0, -20.0, -200.0] {
        scene.push(
            &store,
            [low, mid, high],
            Vector3::new(0.0, 0.0, z),
            Vector3::new(0.0, 0.0, 0.0),
            1.0,
        );
    }
    scene.update_distances(Point3::new(0.0, 0.0, 0.0));

    let items = build_pass(&scene, &store, &frame(QualityLevel::Mid), Pass::Opaque);
    assert!(items.iter().all(|item| item.bundle == mid.index()));
}
