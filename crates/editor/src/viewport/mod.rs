//! Viewport math: camera, pointer mapping, layers and ray picking

pub mod camera;
pub mod input;
pub mod layers;
pub mod picking;
pub mod pointer;

pub use camera::ArcBallCamera;
pub use input::InputEvent;
pub use layers::{Layer, Layers};
