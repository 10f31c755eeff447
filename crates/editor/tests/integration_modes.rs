//! Integration tests for the editor's mode routing, driven through
//! screen-space input events.

use egui::PointerButton;
use glam::Vec3;
use snap_editor_lib::drag::{Cursor, DragEvent};
use snap_editor_lib::state::settings::EditorSettings;
use snap_editor_lib::viewport::input::InputEvent;
use snap_editor_lib::{Editor, EditorEvent};

fn editor() -> Editor {
    Editor::with_seed(EditorSettings::default(), 5)
}

fn press(e: &mut Editor, world: Vec3) {
    let pos = e.screen_position(world).unwrap();
    e.handle_input(&InputEvent::PointerMove { pos });
    e.handle_input(&InputEvent::PointerDown {
        pos,
        button: PointerButton::Primary,
    });
}

fn move_to(e: &mut Editor, world: Vec3) {
    let pos = e.screen_position(world).unwrap();
    e.handle_input(&InputEvent::PointerMove { pos });
}

fn release(e: &mut Editor) {
    e.handle_input(&InputEvent::PointerUp {
        pos: egui::Pos2::ZERO,
    });
}

#[test]
fn test_add_mode_places_on_marker() {
    let mut e = editor();
    e.set_add_object_mode(true);
    move_to(&mut e, Vec3::new(1.0, 0.0, -1.0));
    e.frame();
    assert!(e.marker.visible);
    assert!(e.marker.position.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0), 1e-4));

    press(&mut e, Vec3::new(1.0, 0.0, -1.0));
    assert_eq!(e.scene.block_count(), 1);
    let block = e.scene.blocks().next().unwrap();
    assert!(block.position.abs_diff_eq(Vec3::new(1.0, 0.25, -1.0), 1e-4));
    // Add mode never starts a drag
    assert!(!e.drag.is_dragging());
}

#[test]
fn test_leaving_add_mode_hides_marker() {
    let mut e = editor();
    e.set_add_object_mode(true);
    move_to(&mut e, Vec3::ZERO);
    e.frame();
    assert!(e.marker.visible);

    e.set_add_object_mode(false);
    e.frame();
    assert!(!e.marker.visible);
    assert!(e.mode().drag_enabled);
}

#[test]
fn test_add_mode_switch_waits_for_drag_end() {
    let mut e = editor();
    let id = e.place_at(Vec3::ZERO).unwrap();
    press(&mut e, Vec3::ZERO);
    assert!(e.drag.is_dragging());

    e.set_add_object_mode(true);
    assert!(!e.mode().add_object_mode);
    assert_eq!(e.pending_add_mode(), Some(true));

    // The in-progress drag keeps following the pointer through frames
    e.frame();
    move_to(&mut e, Vec3::new(-2.0, 0.0, 0.0));
    e.frame();
    let pos = e.scene.world_position(&id).unwrap();
    assert!(pos.abs_diff_eq(Vec3::new(-2.0, 0.25, 0.0), 1e-4));
    assert!(e.drag.is_dragging());

    release(&mut e);
    assert!(e.mode().add_object_mode);
    assert!(!e.mode().drag_enabled);
    assert_eq!(e.pending_add_mode(), None);

    let events = e.drain_events();
    let end = events
        .iter()
        .position(|ev| matches!(ev, EditorEvent::Pointer(DragEvent::DragEnd { .. })))
        .unwrap();
    let mode = events
        .iter()
        .position(|ev| matches!(ev, EditorEvent::ModeChanged { add_object_mode: true }))
        .unwrap();
    assert!(end < mode);
}

#[test]
fn test_press_on_empty_space_changes_nothing() {
    let mut e = editor();
    e.place_at(Vec3::ZERO).unwrap();
    e.drain_events();
    let before = e.mode();
    press(&mut e, Vec3::new(2.5, 0.0, 1.5));
    assert!(!e.drag.is_dragging());
    assert_eq!(e.mode(), before);
    assert!(e
        .drain_events()
        .iter()
        .all(|ev| !matches!(ev, EditorEvent::Pointer(DragEvent::DragStart { .. }))));
}

#[test]
fn test_hover_cursor() {
    let mut e = editor();
    e.place_at(Vec3::ZERO).unwrap();
    move_to(&mut e, Vec3::ZERO);
    assert_eq!(e.cursor(), Cursor::Pointer);
    press(&mut e, Vec3::ZERO);
    assert_eq!(e.cursor(), Cursor::Move);
    release(&mut e);
    assert_eq!(e.cursor(), Cursor::Pointer);
    move_to(&mut e, Vec3::new(2.5, 0.0, 1.5));
    assert_eq!(e.cursor(), Cursor::Auto);
}

#[test]
fn test_drag_snaps_on_release() {
    let mut e = editor();
    let a = e.place_at(Vec3::ZERO).unwrap();
    let b = e.place_at(Vec3::new(1.5, 0.0, 0.0)).unwrap();
    e.drag_block_to(&a, Vec3::new(0.4, 0.0, 0.0)).unwrap();

    let events = e.drain_events();
    let snapped = events.iter().find_map(|ev| match ev {
        EditorEvent::Snapped(c) => Some(c.clone()),
        _ => None,
    });
    let snapped = snapped.unwrap();
    assert_eq!(snapped.target, b);

    let pa = e.scene.connection_points_world(&a)[1];
    let pb = e.scene.connection_points_world(&b)[0];
    assert!(pa.distance(pb) < 1e-5);
    assert!(!e.scene.get(&a).unwrap().highlighted);
}

#[test]
fn test_undo_reverts_drag_and_snap() {
    let mut e = editor();
    let a = e.place_at(Vec3::ZERO).unwrap();
    e.place_at(Vec3::new(1.5, 0.0, 0.0)).unwrap();
    e.drag_block_to(&a, Vec3::new(0.4, 0.0, 0.0)).unwrap();
    assert!(e.undo());
    assert_eq!(e.scene.world_position(&a), Some(Vec3::new(0.0, 0.25, 0.0)));
    assert!(e.redo());
    assert!(e.scene.world_position(&a).unwrap().abs_diff_eq(Vec3::new(0.5, 0.25, 0.0), 1e-4));
}

#[test]
fn test_touch_drag() {
    let mut e = editor();
    let id = e.place_at(Vec3::ZERO).unwrap();
    let start = e.screen_position(Vec3::ZERO).unwrap();
    let end = e.screen_position(Vec3::new(0.0, 0.0, 1.5)).unwrap();

    e.handle_input(&InputEvent::TouchStart { touches: vec![start] });
    assert!(e.drag.is_dragging());
    e.handle_input(&InputEvent::TouchMove { touches: vec![end] });
    e.handle_input(&InputEvent::TouchEnd);
    assert!(!e.drag.is_dragging());
    let pos = e.scene.world_position(&id).unwrap();
    assert!(pos.abs_diff_eq(Vec3::new(0.0, 0.25, 1.5), 1e-4));

    // Touch without touch points is ignored
    e.handle_input(&InputEvent::TouchStart { touches: vec![] });
    assert!(!e.drag.is_dragging());
}

#[test]
fn test_rotate_key_setting() {
    let mut settings = EditorSettings::default();
    settings.keys.rotate = "Space".to_string();
    let mut e = Editor::with_seed(settings, 1);
    let id = e.place_at(Vec3::ZERO).unwrap();
    press(&mut e, Vec3::ZERO);

    e.handle_input(&InputEvent::KeyDown { key: egui::Key::R });
    assert_eq!(e.scene.get(&id).unwrap().rotation, glam::Quat::IDENTITY);
    e.handle_input(&InputEvent::KeyDown {
        key: egui::Key::Space,
    });
    assert_ne!(e.scene.get(&id).unwrap().rotation, glam::Quat::IDENTITY);
    assert!(e
        .drain_events()
        .iter()
        .any(|ev| matches!(ev, EditorEvent::Rotated { object } if *object == id)));
}

#[test]
fn test_viewport_offset_respected() {
    let mut e = editor();
    let id = e.place_at(Vec3::ZERO).unwrap();
    e.handle_input(&InputEvent::Resize {
        rect: egui::Rect::from_min_size(egui::pos2(200.0, 100.0), egui::vec2(800.0, 600.0)),
    });
    let pos = e.screen_position(Vec3::ZERO).unwrap();
    assert!((pos.x - 600.0).abs() < 1e-3);
    assert!((pos.y - 400.0).abs() < 1e-3);

    press(&mut e, Vec3::ZERO);
    assert_eq!(e.drag.selected(), Some(&id));
}
