//! Mode and input routing
//!
//! The [`Editor`] owns the scene, camera, drag controller and placement
//! marker, and decides which of them receives each input event. Everything
//! runs on the caller's thread: the host feeds input events as they arrive
//! and calls [`Editor::frame`] once per display refresh.

use egui::{Pos2, Rect};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use shared::{ObjectId, SceneDescription};

use crate::drag::{Cursor, DragControls, DragEvent};
use crate::placement::{place_new_object, PlacementMarker};
use crate::snap::{resolve_snap, SnapCorrection};
use crate::state::scene::SceneState;
use crate::state::settings::EditorSettings;
use crate::viewport::camera::ArcBallCamera;
use crate::viewport::input::InputEvent;
use crate::viewport::layers::Layer;
use crate::viewport::picking::{Plane, Ray};
use crate::viewport::pointer::{map_pointer, map_position, RawPointer};

/// Which interaction currently owns the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeState {
    pub add_object_mode: bool,
    pub drag_enabled: bool,
    pub orbit_enabled: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            add_object_mode: false,
            drag_enabled: true,
            orbit_enabled: true,
        }
    }
}

/// Everything the editor reports back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorEvent {
    Pointer(DragEvent),
    Placed { object: ObjectId, position: Vec3 },
    Snapped(SnapCorrection),
    ModeChanged { add_object_mode: bool },
    Rotated { object: ObjectId },
}

pub struct Editor {
    pub scene: SceneState,
    pub camera: ArcBallCamera,
    pub drag: DragControls,
    pub marker: PlacementMarker,
    pub settings: EditorSettings,
    mode: ModeState,
    viewport: Rect,
    /// Last pointer position in normalized device coordinates
    pointer: Option<Vec2>,
    /// Mode switch requested while a drag was active
    pending_add_mode: Option<bool>,
    /// Receives keyboard commands; set only while dragging
    key_target: Option<ObjectId>,
    rng: StdRng,
    events: Vec<EditorEvent>,
}

impl Editor {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Editor with deterministic block colors
    pub fn with_seed(settings: EditorSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: EditorSettings, rng: StdRng) -> Self {
        let viewport = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let mut camera = ArcBallCamera::new(&settings.camera);
        camera.resize(viewport.width(), viewport.height());
        let drag = DragControls::new(Plane::horizontal(settings.drag.plane_height), Layer::Draggable);

        Self {
            scene: SceneState::default(),
            camera,
            drag,
            marker: PlacementMarker::default(),
            settings,
            mode: ModeState::default(),
            viewport,
            pointer: None,
            pending_add_mode: None,
            key_target: None,
            rng,
            events: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn cursor(&self) -> Cursor {
        self.drag.cursor()
    }

    pub fn pending_add_mode(&self) -> Option<bool> {
        self.pending_add_mode
    }

    pub fn key_target(&self) -> Option<&ObjectId> {
        self.key_target.as_ref()
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Mode switching ────────────────────────────────────────

    /// Request add-object mode on or off. While a drag is active the switch
    /// waits until the drag ends.
    pub fn set_add_object_mode(&mut self, enabled: bool) {
        if self.drag.is_dragging() {
            tracing::debug!("Deferring add-object mode = {} until drag end", enabled);
            self.pending_add_mode = Some(enabled);
        } else {
            self.pending_add_mode = None;
            self.apply_add_mode(enabled);
        }
    }

    fn apply_add_mode(&mut self, enabled: bool) {
        if self.mode.add_object_mode == enabled {
            return;
        }
        self.mode.add_object_mode = enabled;
        self.mode.drag_enabled = !enabled;
        if enabled {
            self.drag.deactivate();
            self.drag.enabled = false;
            self.refresh_marker();
        } else {
            self.drag.activate();
            self.drag.enabled = true;
            self.marker.hide();
        }
        self.collect_drag_events();
        tracing::info!("Add-object mode {}", if enabled { "on" } else { "off" });
        self.events.push(EditorEvent::ModeChanged {
            add_object_mode: enabled,
        });
    }

    /// Per-frame routing: applies a deferred mode switch once idle, then
    /// tracks the marker in add-object mode or hides it otherwise.
    pub fn frame(&mut self) -> Vec<EditorEvent> {
        if !self.drag.is_dragging() {
            if let Some(enabled) = self.pending_add_mode.take() {
                self.apply_add_mode(enabled);
            }
        }

        if self.mode.add_object_mode {
            self.refresh_marker();
        } else {
            self.marker.hide();
        }
        self.drain_events()
    }

    fn refresh_marker(&mut self) {
        match self.pointer {
            Some(ndc) => {
                let ray = self.camera.ray_from_ndc(ndc);
                self.marker.update(&ray, &self.settings.ground);
            }
            None => self.marker.hide(),
        }
    }

    // ── Input routing ─────────────────────────────────────────

    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMove { pos } => {
                let ray = self.track_pointer(*pos);
                if self.mode.add_object_mode {
                    self.marker.update(&ray, &self.settings.ground);
                }
                self.drag.pointer_move(&ray, &mut self.scene);
            }
            InputEvent::PointerDown { pos, button } => {
                let ray = self.track_pointer(*pos);
                if *button != egui::PointerButton::Primary {
                    return;
                }
                self.press(&ray, *pos);
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                self.drag.pointer_cancel();
            }
            InputEvent::TouchStart { touches } => {
                if let (Some(ray), Some(&first)) = (self.track_touch(touches), touches.first()) {
                    if self.mode.add_object_mode {
                        self.press(&ray, first);
                    } else {
                        self.drag.touch_start(&ray, &self.scene);
                    }
                }
            }
            InputEvent::TouchMove { touches } => {
                if let Some(ray) = self.track_touch(touches) {
                    if self.mode.add_object_mode {
                        self.marker.update(&ray, &self.settings.ground);
                    }
                    self.drag.touch_move(&ray, &mut self.scene);
                }
            }
            InputEvent::TouchEnd => self.drag.touch_end(),
            InputEvent::KeyDown { key } => self.key_down(*key),
            InputEvent::Resize { rect } => {
                self.resize(*rect);
            }
            InputEvent::OrbitDrag { delta } => {
                if self.mode.orbit_enabled {
                    self.camera.rotate(delta.x, delta.y);
                }
            }
            InputEvent::Pan { delta } => {
                if self.mode.orbit_enabled {
                    self.camera.pan(delta.x, delta.y);
                }
            }
            InputEvent::Zoom { delta } => {
                if self.mode.orbit_enabled {
                    self.camera.zoom(*delta);
                }
            }
        }
        self.collect_drag_events();
    }

    fn track_pointer(&mut self, pos: Pos2) -> Ray {
        let ndc = map_position(pos, self.viewport);
        self.pointer = Some(ndc);
        self.camera.ray_from_ndc(ndc)
    }

    fn track_touch(&mut self, touches: &[Pos2]) -> Option<Ray> {
        let ndc = map_pointer(&RawPointer::Touch(touches.to_vec()), self.viewport)?;
        self.pointer = Some(ndc);
        Some(self.camera.ray_from_ndc(ndc))
    }

    /// Primary press: places a block in add-object mode, otherwise starts a drag.
    /// Placement needs the press to land on the render surface.
    fn press(&mut self, ray: &Ray, pos: Pos2) {
        if self.mode.add_object_mode {
            if !self.viewport.contains(pos) {
                return;
            }
            if self.marker.update(ray, &self.settings.ground) {
                if let Err(e) = self.place_at(self.marker.position) {
                    tracing::debug!("Placement skipped: {}", e);
                }
            }
        } else {
            self.drag.pointer_down(ray, &self.scene);
        }
    }

    fn key_down(&mut self, key: egui::Key) {
        if key != self.settings.keys.rotate_key() {
            return;
        }
        let Some(target) = self.key_target.clone() else {
            return;
        };
        if self.scene.rotate_quarter_turn(&target) {
            tracing::debug!("Rotated {}", target);
            self.events.push(EditorEvent::Rotated { object: target });
        }
    }

    /// Move the drag plane; takes effect on the next drag start
    pub fn set_drag_plane_height(&mut self, height: f32) {
        self.settings.drag.plane_height = height;
        self.drag.set_plane(Plane::horizontal(height));
    }

    /// Viewport moved or changed size; only the camera is affected.
    /// An empty rect is ignored and reported as `false`.
    pub fn resize(&mut self, rect: Rect) -> bool {
        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            tracing::debug!("Ignoring empty viewport {:?}", rect);
            return false;
        }
        self.viewport = rect;
        self.camera.resize(rect.width(), rect.height());
        true
    }

    /// Turn controller events into editor side effects
    fn collect_drag_events(&mut self) {
        for event in self.drag.drain_events() {
            match &event {
                DragEvent::DragStart { object } => {
                    self.scene.begin_drag();
                    self.scene.set_highlighted(object, true);
                    self.camera.show_layer(Layer::Connection);
                    self.mode.orbit_enabled = false;
                    self.key_target = Some(object.clone());
                    self.events.push(EditorEvent::Pointer(event.clone()));
                }
                DragEvent::DragEnd { object } => {
                    self.events.push(EditorEvent::Pointer(event.clone()));
                    self.finish_drag(object);
                }
                _ => self.events.push(EditorEvent::Pointer(event.clone())),
            }
        }
    }

    fn finish_drag(&mut self, object: &str) {
        if let Some(correction) = resolve_snap(&mut self.scene, object, &self.settings.snap) {
            self.events.push(EditorEvent::Snapped(correction));
        }
        self.scene.set_highlighted(object, false);
        self.camera.hide_layer(Layer::Connection);
        self.mode.orbit_enabled = true;
        self.key_target = None;

        if let Some(enabled) = self.pending_add_mode.take() {
            self.apply_add_mode(enabled);
        }
    }

    // ── Programmatic operations ───────────────────────────────

    /// Place a block resting on `marker`, regardless of the current mode.
    /// Refused while a drag is active.
    pub fn place_at(&mut self, marker: Vec3) -> Result<ObjectId, String> {
        if self.drag.is_dragging() {
            return Err("Cannot place a block while dragging".to_string());
        }
        let id = place_new_object(&mut self.scene, marker, &self.settings.placement, &mut self.rng);
        let position = self.scene.get(&id).map(|n| n.position).unwrap_or(marker);
        self.events.push(EditorEvent::Placed {
            object: id.clone(),
            position,
        });
        Ok(id)
    }

    /// Replace the scene with a snapshot; refused while a drag is active
    pub fn load_scene(&mut self, description: &SceneDescription) -> Result<(), String> {
        if self.drag.is_dragging() {
            return Err("Cannot load a scene while dragging".to_string());
        }
        self.scene
            .load_description(description)
            .map_err(|e| e.to_string())
    }

    /// `load_scene` from snapshot JSON
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        if self.drag.is_dragging() {
            return Err("Cannot load a scene while dragging".to_string());
        }
        self.scene.load_json(json).map_err(|e| e.to_string())
    }

    /// Stop reacting to input. An active drag ends as if released.
    pub fn dispose(&mut self) {
        self.drag.deactivate();
        self.collect_drag_events();
        self.drag.dispose();
    }

    /// Screen position of a world point in the current viewport
    pub fn screen_position(&self, point: Vec3) -> Option<Pos2> {
        self.camera.project(point, self.viewport)
    }

    /// Drag a block through the pointer pipeline so its footprint on the drag
    /// plane follows `target` (x, z), then release it.
    pub fn drag_block_to(&mut self, id: &str, target: Vec3) -> Result<(), String> {
        if self.mode.add_object_mode {
            return Err("Cannot drag while add-object mode is active".to_string());
        }
        let start = self
            .scene
            .world_position(id)
            .ok_or_else(|| format!("Object not found: {id}"))?;

        let height = self.settings.drag.plane_height;
        let grab = self
            .screen_position(Vec3::new(start.x, height, start.z))
            .ok_or("Object is behind the camera")?;
        let drop = self
            .screen_position(Vec3::new(target.x, height, target.z))
            .ok_or("Target is behind the camera")?;

        self.handle_input(&InputEvent::PointerMove { pos: grab });
        self.handle_input(&InputEvent::PointerDown {
            pos: grab,
            button: egui::PointerButton::Primary,
        });
        if self.drag.selected().map(String::as_str) != Some(id) {
            self.handle_input(&InputEvent::PointerUp { pos: grab });
            return Err(format!("Object {id} is not under the pointer"));
        }
        self.handle_input(&InputEvent::PointerMove { pos: drop });
        self.handle_input(&InputEvent::PointerUp { pos: drop });
        Ok(())
    }

    /// Undo the last scene change; ignored while dragging
    pub fn undo(&mut self) -> bool {
        if self.drag.is_dragging() || !self.scene.can_undo() {
            return false;
        }
        self.scene.undo();
        true
    }

    /// Redo the last undone change; ignored while dragging
    pub fn redo(&mut self) -> bool {
        if self.drag.is_dragging() || !self.scene.can_redo() {
            return false;
        }
        self.scene.redo();
        true
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
