//! Integration tests for the drag controller and snap resolver working
//! together on a live scene.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snap_editor_lib::drag::{DragControls, DragEvent};
use snap_editor_lib::fixtures::*;
use snap_editor_lib::placement::place_new_object;
use snap_editor_lib::snap::{point_distance, resolve_snap};
use snap_editor_lib::state::scene::SceneState;
use snap_editor_lib::state::settings::{PlacementSettings, SnapSettings};
use snap_editor_lib::viewport::layers::Layer;
use snap_editor_lib::viewport::picking::{ray_plane, Plane, Ray};

fn down(x: f32, z: f32) -> Ray {
    Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
}

fn controls() -> DragControls {
    DragControls::new(Plane::horizontal(0.0), Layer::Draggable)
}

/// A placed at the origin, B placed 1.5 to the right
fn placed_pair() -> (SceneState, String, String) {
    let mut scene = SceneState::default();
    let mut rng = StdRng::seed_from_u64(11);
    let settings = PlacementSettings::default();
    let a = place_new_object(&mut scene, Vec3::ZERO, &settings, &mut rng);
    let b = place_new_object(&mut scene, Vec3::new(1.5, 0.0, 0.0), &settings, &mut rng);
    (scene, a, b)
}

/// Grab `id` at its ground footprint, move to (x, z) and release
fn drag_to(scene: &mut SceneState, c: &mut DragControls, id: &str, x: f32, z: f32) {
    let start = scene.world_position(id).unwrap();
    c.pointer_down(&down(start.x, start.z), scene);
    assert_eq!(c.selected().map(String::as_str), Some(id));
    c.pointer_move(&down(x, z), scene);
    c.pointer_cancel();
}

#[test]
fn test_placement_scenario_distances() {
    let (mut scene, a, b) = placed_pair();
    let mut c = controls();
    let settings = SnapSettings::default();

    assert_eq!(scene.connection_points_world(&a)[1], Vec3::new(0.5, 0.25, 0.0));
    assert_eq!(scene.connection_points_world(&b)[0], Vec3::new(1.0, 0.25, 0.0));
    assert_eq!(point_distance(&scene, &a, 1, &b, 0), Some(0.5));

    drag_to(&mut scene, &mut c, &a, 0.9, 0.0);
    assert_eq!(scene.world_position(&a), Some(Vec3::new(0.9, 0.25, 0.0)));
    assert!(resolve_snap(&mut scene, &a, &settings).is_none());
    let d = point_distance(&scene, &a, 1, &b, 0).unwrap();
    assert!((d - 0.4).abs() < 1e-6);

    drag_to(&mut scene, &mut c, &a, 1.05, 0.0);
    assert!(resolve_snap(&mut scene, &a, &settings).is_none());
    assert_eq!(scene.world_position(&a), Some(Vec3::new(1.05, 0.25, 0.0)));
    let d = point_distance(&scene, &a, 1, &b, 0).unwrap();
    assert!((d - 0.55).abs() < 1e-6);
}

#[test]
fn test_drag_then_snap_closes_gap() {
    let (mut scene, a, b) = placed_pair();
    let mut c = controls();

    drag_to(&mut scene, &mut c, &a, 0.375, 0.0);
    let correction = resolve_snap(&mut scene, &a, &SnapSettings::default()).unwrap();
    assert_eq!(correction.target, b);
    assert_eq!(point_distance(&scene, &a, 1, &b, 0), Some(0.0));
    assert_eq!(scene.world_position(&a), Some(Vec3::new(0.5, 0.25, 0.0)));

    // Already aligned: nothing further happens
    assert!(resolve_snap(&mut scene, &a, &SnapSettings::default()).is_none());
}

#[test]
fn test_moved_position_is_intersection_minus_offset() {
    let (mut scene, a, _) = placed_pair();
    let mut c = controls();
    c.pointer_down(&down(0.25, 0.125), &scene);
    let offset = c.session().unwrap().offset;

    for (x, z) in [(0.5, 0.5), (-2.0, 3.25), (4.75, -1.5)] {
        let ray = down(x, z);
        c.pointer_move(&ray, &mut scene);
        let expected = ray_plane(&ray, &Plane::horizontal(0.0)).unwrap() - offset;
        assert_eq!(scene.get(&a).unwrap().position, expected);
    }
}

#[test]
fn test_grouped_block_drag_and_snap_in_parent_space() {
    let mut description = scene_grouped_block();
    // Free block whose left point sits at world (3.5, 0.25, 0)
    description.nodes.push(block_node("b", [4.0, 0.25, 0.0]));
    let mut scene = SceneState::default();
    scene.load_description(&description).unwrap();

    let mut c = controls();
    drag_to(&mut scene, &mut c, "a", 2.875, 0.0);
    assert_eq!(scene.get("a").unwrap().position, Vec3::new(0.875, 0.25, 0.0));

    // Right point at world 3.375, 0.125 short of b's left point
    let correction = resolve_snap(&mut scene, "a", &SnapSettings::default()).unwrap();
    assert_eq!(correction.delta, Vec3::new(0.125, 0.0, 0.0));
    assert_eq!(scene.get("a").unwrap().position, Vec3::new(1.0, 0.25, 0.0));
    assert_eq!(point_distance(&scene, "a", 1, "b", 0), Some(0.0));
}

#[test]
fn test_group_never_snaps_to_its_own_children() {
    let description = scene(vec![
        block_node("parent", [0.0, 0.25, 0.0]),
        child_block_node("child", "parent", [1.05, 0.0, 0.0]),
    ]);
    let mut state = SceneState::default();
    state.load_description(&description).unwrap();
    // parent's right point and child's left point are 0.05 apart, but they move together
    assert!(resolve_snap(&mut state, "parent", &SnapSettings::default()).is_none());
}

#[test]
fn test_full_event_sequence() {
    let (mut scene, a, _) = placed_pair();
    let mut c = controls();
    c.pointer_move(&down(0.0, 0.0), &mut scene);
    c.pointer_down(&down(0.0, 0.0), &scene);
    c.pointer_move(&down(0.5, 0.0), &mut scene);
    c.pointer_move(&down(0.75, 0.0), &mut scene);
    c.pointer_cancel();
    c.pointer_move(&down(-5.0, 0.0), &mut scene);

    let events = c.drain_events();
    assert_eq!(
        events,
        vec![
            DragEvent::HoverOn { object: a.clone() },
            DragEvent::DragStart { object: a.clone() },
            DragEvent::Drag { object: a.clone() },
            DragEvent::Drag { object: a.clone() },
            DragEvent::DragEnd { object: a.clone() },
            DragEvent::HoverOff { object: a },
        ]
    );
}
