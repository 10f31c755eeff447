//! Host-independent input events

use egui::{Pos2, Rect, Vec2};

/// Input the editor consumes, in page coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMove { pos: Pos2 },
    PointerDown { pos: Pos2, button: egui::PointerButton },
    PointerUp { pos: Pos2 },
    PointerLeave,
    TouchStart { touches: Vec<Pos2> },
    TouchMove { touches: Vec<Pos2> },
    TouchEnd,
    KeyDown { key: egui::Key },
    /// Viewport moved or changed size
    Resize { rect: Rect },
    /// Orbit the camera by a screen-space delta (degrees)
    OrbitDrag { delta: Vec2 },
    /// Pan the camera by a world-space delta
    Pan { delta: Vec2 },
    /// Zoom factor delta; positive zooms in
    Zoom { delta: f32 },
}

/// Translate an egui event. Returns `None` for events the editor ignores.
pub fn from_egui_event(event: &egui::Event) -> Option<InputEvent> {
    match event {
        egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMove { pos: *pos }),
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            ..
        } => Some(InputEvent::PointerDown {
            pos: *pos,
            button: *button,
        }),
        egui::Event::PointerButton {
            pos,
            pressed: false,
            ..
        } => Some(InputEvent::PointerUp { pos: *pos }),
        egui::Event::PointerGone => Some(InputEvent::PointerLeave),
        egui::Event::Touch { phase, pos, .. } => match phase {
            egui::TouchPhase::Start => Some(InputEvent::TouchStart { touches: vec![*pos] }),
            egui::TouchPhase::Move => Some(InputEvent::TouchMove { touches: vec![*pos] }),
            egui::TouchPhase::End | egui::TouchPhase::Cancel => Some(InputEvent::TouchEnd),
        },
        egui::Event::Key {
            key,
            pressed: true,
            repeat: false,
            ..
        } => Some(InputEvent::KeyDown { key: *key }),
        egui::Event::Zoom(factor) => Some(InputEvent::Zoom {
            delta: factor - 1.0,
        }),
        _ => None,
    }
}
