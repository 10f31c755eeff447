// Library crate: the editor core, usable headless from tests, the script
// runner binary and the wasm facade.

pub mod command;
pub mod drag;
pub mod editor;
pub mod fixtures;
pub mod placement;
pub mod snap;
pub mod state;
pub mod viewport;

pub use editor::{Editor, EditorEvent, ModeState};
