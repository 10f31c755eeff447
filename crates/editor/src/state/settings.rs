//! Editor settings

use serde::{Deserialize, Serialize};

/// Which connection-point pair wins when several are within the snap threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// First pair found in iteration order
    First,
    /// Pair with the smallest distance; ties go to the earlier pair
    #[default]
    Closest,
    /// Last pair found in iteration order
    Last,
}

/// Connection-point snapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSettings {
    /// Enable snapping on drag end
    pub enabled: bool,
    /// Pairs strictly closer than this (world units) snap together
    pub threshold: f32,
    pub policy: SnapPolicy,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.2,
            policy: SnapPolicy::Closest,
        }
    }
}

/// Drag plane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragSettings {
    /// Height of the horizontal drag plane
    pub plane_height: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self { plane_height: 0.0 }
    }
}

/// Geometry of newly placed blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Block extents (width, height, depth)
    pub size: [f32; 3],
    /// Connection point offsets relative to the block center
    pub connection_points: Vec<[f32; 3]>,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            size: [1.0, 0.5, 0.5],
            connection_points: vec![[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, 0.0, 0.25]],
        }
    }
}

/// Ground plane the placement marker is projected onto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSettings {
    /// Height of the ground plane
    pub height: f32,
    /// Half of the ground's side length; the marker hides outside it
    pub half_extent: f32,
}

impl Default for GroundSettings {
    fn default() -> Self {
        Self {
            height: 0.0,
            half_extent: 10.0,
        }
    }
}

/// Initial camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 4.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Keyboard bindings, stored as `egui::Key` names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySettings {
    /// Rotates the dragged block a quarter turn about the vertical axis
    pub rotate: String,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            rotate: "R".to_string(),
        }
    }
}

impl KeySettings {
    /// Resolved rotate key; falls back to `R` for unknown names
    pub fn rotate_key(&self) -> egui::Key {
        egui::Key::from_name(&self.rotate).unwrap_or(egui::Key::R)
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EditorSettings {
    #[serde(default)]
    pub snap: SnapSettings,
    #[serde(default)]
    pub drag: DragSettings,
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub ground: GroundSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub keys: KeySettings,
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "snap-editor", "snap-editor") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring invalid settings in {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    /// Save settings to file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "snap-editor", "snap-editor") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    let _ = std::fs::write(config_path, json);
                }
            }
        }
    }
}
