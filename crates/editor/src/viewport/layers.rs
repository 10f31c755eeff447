use serde::{Deserialize, Serialize};

/// Visibility tag used to include or exclude geometry from cameras and ray queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Scenery: ground, lights, markers
    #[default]
    Default,
    /// Bodies that the drag controller may pick
    Draggable,
    /// Connection points, only shown while a drag is active
    Connection,
}

impl Layer {
    fn bit(self) -> u32 {
        match self {
            Layer::Default => 1 << 0,
            Layer::Draggable => 1 << 1,
            Layer::Connection => 1 << 2,
        }
    }
}

/// Set of layers a camera renders or a ray query accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers(u32);

impl Layers {
    pub const NONE: Layers = Layers(0);

    pub fn only(layer: Layer) -> Self {
        Self(layer.bit())
    }

    pub fn enable(&mut self, layer: Layer) {
        self.0 |= layer.bit();
    }

    pub fn disable(&mut self, layer: Layer) {
        self.0 &= !layer.bit();
    }

    pub fn contains(&self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }
}

impl Default for Layers {
    fn default() -> Self {
        let mut layers = Self::only(Layer::Default);
        layers.enable(Layer::Draggable);
        layers
    }
}

impl From<Layer> for Layers {
    fn from(layer: Layer) -> Self {
        Self::only(layer)
    }
}
