use serde::Serialize;
use shared::SceneDescription;
use snap_editor_lib::command::execute_json;
use snap_editor_lib::state::settings::EditorSettings;
use snap_editor_lib::viewport::input::InputEvent;
use snap_editor_lib::Editor;
use wasm_bindgen::prelude::*;

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("Snap editor WASM initialized");
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn pos(x: f32, y: f32) -> egui::Pos2 {
    egui::pos2(x, y)
}

/// Flat [x0, y0, x1, y1, ...] touch list from JS
fn touches(coords: &[f32]) -> Vec<egui::Pos2> {
    coords.chunks_exact(2).map(|c| pos(c[0], c[1])).collect()
}

/// Editor instance driven by DOM events. Coordinates are page (client)
/// coordinates; the canvas rect is supplied through `resize`.
#[wasm_bindgen]
pub struct EditorHandle {
    editor: Editor,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Create an editor. `settings_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str) -> Result<EditorHandle, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            EditorSettings::load()
        } else {
            serde_json::from_str(settings_json)
                .map_err(|e| JsError::new(&format!("Invalid settings: {e}")))?
        };
        Ok(Self {
            editor: Editor::new(settings),
        })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.editor.handle_input(&InputEvent::PointerMove { pos: pos(x, y) });
    }

    /// `button` follows DOM numbering: 0 primary, 1 middle, 2 secondary
    pub fn pointer_down(&mut self, x: f32, y: f32, button: u8) {
        let button = match button {
            0 => egui::PointerButton::Primary,
            1 => egui::PointerButton::Middle,
            2 => egui::PointerButton::Secondary,
            3 => egui::PointerButton::Extra1,
            _ => egui::PointerButton::Extra2,
        };
        self.editor.handle_input(&InputEvent::PointerDown {
            pos: pos(x, y),
            button,
        });
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.editor.handle_input(&InputEvent::PointerUp { pos: pos(x, y) });
    }

    pub fn pointer_leave(&mut self) {
        self.editor.handle_input(&InputEvent::PointerLeave);
    }

    pub fn touch_start(&mut self, coords: &[f32]) {
        self.editor.handle_input(&InputEvent::TouchStart {
            touches: touches(coords),
        });
    }

    pub fn touch_move(&mut self, coords: &[f32]) {
        self.editor.handle_input(&InputEvent::TouchMove {
            touches: touches(coords),
        });
    }

    pub fn touch_end(&mut self) {
        self.editor.handle_input(&InputEvent::TouchEnd);
    }

    /// Key by `egui::Key` name (e.g. "R"). Returns false for unknown names.
    pub fn key_down(&mut self, name: &str) -> bool {
        match egui::Key::from_name(name) {
            Some(key) => {
                self.editor.handle_input(&InputEvent::KeyDown { key });
                true
            }
            None => false,
        }
    }

    /// Returns false for an empty rect, which is ignored
    pub fn resize(&mut self, left: f32, top: f32, width: f32, height: f32) -> bool {
        self.editor
            .resize(egui::Rect::from_min_size(pos(left, top), egui::vec2(width, height)))
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.editor.handle_input(&InputEvent::OrbitDrag {
            delta: egui::vec2(dx, dy),
        });
    }

    pub fn zoom(&mut self, delta: f32) {
        self.editor.handle_input(&InputEvent::Zoom { delta });
    }

    pub fn set_add_object_mode(&mut self, enabled: bool) {
        self.editor.set_add_object_mode(enabled);
    }

    /// Per-frame routing; returns the events emitted since the last frame
    pub fn frame(&mut self) -> Result<JsValue, JsValue> {
        let events = self.editor.frame();
        to_js(&events)
    }

    /// Cursor name for the canvas style ("auto", "pointer", "move")
    pub fn cursor(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.cursor())
    }

    pub fn mode(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.mode())
    }

    pub fn marker(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.marker)
    }

    /// Column-major view-projection matrix for the host renderer
    pub fn view_projection(&self) -> Vec<f32> {
        self.editor.camera.view_projection().to_cols_array().to_vec()
    }

    /// Scene snapshot as a JS object
    pub fn scene(&self) -> Result<JsValue, JsValue> {
        to_js(&self.editor.scene.to_description())
    }

    pub fn scene_json(&self) -> String {
        self.editor.scene.export_json()
    }

    /// Replace the scene with a snapshot object
    pub fn load_scene(&mut self, scene: JsValue) -> Result<(), JsValue> {
        let description: SceneDescription = serde_wasm_bindgen::from_value(scene)
            .map_err(|e| JsError::new(&format!("Invalid scene: {e}")))?;
        self.editor
            .load_scene(&description)
            .map_err(|e| JsError::new(&e).into())
    }

    /// Stop reacting to input; an active drag ends as if released
    pub fn dispose(&mut self) {
        self.editor.dispose();
    }

    /// Execute a JSON command; returns the response JSON
    pub fn execute(&mut self, json: &str) -> Result<String, JsValue> {
        let response = execute_json(&mut self.editor, json).map_err(|e| JsError::new(&e))?;
        serde_json::to_string(&response).map_err(|e| JsError::new(&e.to_string()).into())
    }
}
