//! JSON command protocol for scripted and headless driving of the editor.

use egui::{pos2, Pos2, Rect};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::editor::Editor;
use crate::state::settings::SnapPolicy;
use crate::viewport::input::InputEvent;

/// Pointer button names accepted by `pointer_down`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    #[default]
    Primary,
    Secondary,
    Middle,
}

impl From<Button> for egui::PointerButton {
    fn from(button: Button) -> Self {
        match button {
            Button::Primary => egui::PointerButton::Primary,
            Button::Secondary => egui::PointerButton::Secondary,
            Button::Middle => egui::PointerButton::Middle,
        }
    }
}

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Place a block resting on a ground point, regardless of mode
    PlaceBlock { position: [f32; 3] },
    SetAddObjectMode { enabled: bool },
    /// Pointer commands take page coordinates
    PointerMove { x: f32, y: f32 },
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default)]
        button: Button,
    },
    PointerUp { x: f32, y: f32 },
    PointerLeave,
    TouchStart { touches: Vec<[f32; 2]> },
    TouchMove { touches: Vec<[f32; 2]> },
    TouchEnd,
    /// Key by `egui::Key` name, e.g. "R"
    KeyDown { key: String },
    Resize {
        #[serde(default)]
        left: f32,
        #[serde(default)]
        top: f32,
        width: f32,
        height: f32,
    },
    /// Run per-frame mode routing
    Frame,
    /// Drag a block through the pointer pipeline and release it
    DragBlock { id: String, to: [f32; 3] },
    /// Adjust snapping; omitted fields keep their value
    SetSnap {
        #[serde(default)]
        enabled: Option<bool>,
        #[serde(default)]
        threshold: Option<f32>,
        #[serde(default)]
        policy: Option<SnapPolicy>,
    },
    SetDragPlane { height: f32 },
    Undo,
    Redo,
    Clear,
    /// List blocks, mode and marker
    Inspect,
    ExportScene,
    LoadScene { scene_json: String },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Command rejected: {msg}");
        Self {
            success: false,
            error: Some(msg),
            data: None,
        }
    }
}

fn touches(points: &[[f32; 2]]) -> Vec<Pos2> {
    points.iter().map(|[x, y]| pos2(*x, *y)).collect()
}

/// Feed one input event and report what it emitted
fn input(editor: &mut Editor, event: InputEvent) -> CommandResponse {
    editor.handle_input(&event);
    let events = editor.drain_events();
    CommandResponse::ok_with_data(serde_json::json!({ "events": events }))
}

/// Execute a single command on the editor.
pub fn execute_command(editor: &mut Editor, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::PlaceBlock { position } => {
            let id = match editor.place_at(Vec3::from(position)) {
                Ok(id) => id,
                Err(e) => return CommandResponse::err(e),
            };
            let position = editor.scene.get(&id).map(|n| n.position.to_array());
            editor.drain_events();
            CommandResponse::ok_with_data(serde_json::json!({ "id": id, "position": position }))
        }

        EditorCommand::SetAddObjectMode { enabled } => {
            editor.set_add_object_mode(enabled);
            CommandResponse::ok_with_data(serde_json::json!({
                "mode": editor.mode(),
                "pending": editor.pending_add_mode(),
            }))
        }

        EditorCommand::PointerMove { x, y } => input(editor, InputEvent::PointerMove { pos: pos2(x, y) }),
        EditorCommand::PointerDown { x, y, button } => input(
            editor,
            InputEvent::PointerDown {
                pos: pos2(x, y),
                button: button.into(),
            },
        ),
        EditorCommand::PointerUp { x, y } => input(editor, InputEvent::PointerUp { pos: pos2(x, y) }),
        EditorCommand::PointerLeave => input(editor, InputEvent::PointerLeave),
        EditorCommand::TouchStart { touches: t } => input(editor, InputEvent::TouchStart { touches: touches(&t) }),
        EditorCommand::TouchMove { touches: t } => input(editor, InputEvent::TouchMove { touches: touches(&t) }),
        EditorCommand::TouchEnd => input(editor, InputEvent::TouchEnd),

        EditorCommand::KeyDown { key } => match egui::Key::from_name(&key) {
            Some(key) => input(editor, InputEvent::KeyDown { key }),
            None => CommandResponse::err(format!("Unknown key: {key}")),
        },

        EditorCommand::Resize {
            left,
            top,
            width,
            height,
        } => {
            if !editor.resize(Rect::from_min_size(pos2(left, top), egui::vec2(width, height))) {
                return CommandResponse::err("Viewport must have a positive size");
            }
            CommandResponse::ok()
        }

        EditorCommand::Frame => {
            let events = editor.frame();
            CommandResponse::ok_with_data(serde_json::json!({
                "events": events,
                "marker": editor.marker,
            }))
        }

        EditorCommand::DragBlock { id, to } => match editor.drag_block_to(&id, Vec3::from(to)) {
            Ok(()) => {
                let events = editor.drain_events();
                let position = editor.scene.world_position(&id).map(|p| p.to_array());
                CommandResponse::ok_with_data(serde_json::json!({
                    "position": position,
                    "events": events,
                }))
            }
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::SetSnap {
            enabled,
            threshold,
            policy,
        } => {
            let snap = &mut editor.settings.snap;
            if let Some(enabled) = enabled {
                snap.enabled = enabled;
            }
            if let Some(threshold) = threshold {
                if threshold < 0.0 {
                    return CommandResponse::err("Snap threshold must not be negative");
                }
                snap.threshold = threshold;
            }
            if let Some(policy) = policy {
                snap.policy = policy;
            }
            CommandResponse::ok_with_data(serde_json::json!({ "snap": editor.settings.snap }))
        }

        EditorCommand::SetDragPlane { height } => {
            if editor.drag.is_dragging() {
                return CommandResponse::err("Cannot move the drag plane while dragging");
            }
            editor.set_drag_plane_height(height);
            CommandResponse::ok()
        }

        EditorCommand::Undo => {
            let success = editor.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = editor.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::Clear => {
            if editor.drag.is_dragging() {
                return CommandResponse::err("Cannot clear while dragging");
            }
            editor.scene.clear();
            CommandResponse::ok()
        }

        EditorCommand::Inspect => {
            let blocks: Vec<serde_json::Value> = editor
                .scene
                .blocks()
                .map(|node| {
                    serde_json::json!({
                        "id": node.id,
                        "name": node.name,
                        "position": editor.scene.world_position(&node.id).map(|p| p.to_array()),
                        "rotation": node.rotation.to_array(),
                        "highlighted": node.highlighted,
                        "connection_points": editor
                            .scene
                            .connection_points_world(&node.id)
                            .iter()
                            .map(|p| p.to_array())
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "block_count": blocks.len(),
                "blocks": blocks,
                "mode": editor.mode(),
                "cursor": editor.cursor(),
                "dragging": editor.drag.selected(),
                "marker": editor.marker,
            }))
        }

        EditorCommand::ExportScene => {
            let json = editor.scene.export_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }

        EditorCommand::LoadScene { scene_json } => {
            match editor.load_scene_json(&scene_json) {
                Ok(()) => CommandResponse::ok_with_data(serde_json::json!({
                    "node_count": editor.scene.nodes().len(),
                })),
                Err(e) => CommandResponse::err(e),
            }
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(editor: &mut Editor, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(editor: &mut Editor, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::settings::EditorSettings;

    fn editor() -> Editor {
        Editor::with_seed(EditorSettings::default(), 3)
    }

    #[test]
    fn test_command_serde_undo() {
        let cmd: EditorCommand = serde_json::from_str(r#"{"command": "undo"}"#).unwrap();
        assert!(matches!(cmd, EditorCommand::Undo));
    }

    #[test]
    fn test_command_serde_pointer_down_default_button() {
        let cmd: EditorCommand =
            serde_json::from_str(r#"{"command": "pointer_down", "x": 1.0, "y": 2.0}"#).unwrap();
        match cmd {
            EditorCommand::PointerDown { button, .. } => assert_eq!(button, Button::Primary),
            _ => panic!("Expected PointerDown"),
        }
    }

    #[test]
    fn test_execute_place_block() {
        let mut e = editor();
        let resp = execute_json(&mut e, r#"{"command": "place_block", "position": [1.5, 0, 0]}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["position"][1], 0.25);
        assert_eq!(e.scene.block_count(), 1);
    }

    #[test]
    fn test_execute_unknown_key() {
        let mut e = editor();
        let resp = execute_json(&mut e, r#"{"command": "key_down", "key": "NoSuchKey"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.error.unwrap().contains("NoSuchKey"));
    }

    #[test]
    fn test_execute_set_snap() {
        let mut e = editor();
        let resp = execute_json(&mut e, r#"{"command": "set_snap", "policy": "first"}"#).unwrap();
        assert!(resp.success);
        assert_eq!(e.settings.snap.policy, SnapPolicy::First);
        assert_eq!(e.settings.snap.threshold, 0.2);

        let resp = execute_json(&mut e, r#"{"command": "set_snap", "threshold": -1}"#).unwrap();
        assert!(!resp.success);
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut e = editor();
        assert!(execute_json(&mut e, "not valid json").is_err());
        assert!(execute_json_batch(&mut e, r#"[{"command": "warp"}]"#).is_err());
    }

    #[test]
    fn test_execute_drag_unknown_block() {
        let mut e = editor();
        let resp = execute_json(&mut e, r#"{"command": "drag_block", "id": "nope", "to": [1, 0, 0]}"#).unwrap();
        assert!(!resp.success);
    }
}
