//! Replay camera configuration.
//!
//! Stored as a commented TOML document. Every numeric field has a declared
//! range; loading resets out-of-range or missing values to their defaults and
//! writes the corrected document back.

mod binding;

pub use binding::{Bindings, InputBinding};

use serde::{Deserialize, Serialize};
use settings::{FieldSpec, Settings, SettingsFile};
use std::path::PathBuf;
use tracing::{error, warn};

/// File name (without extension) of the config document.
pub const CONFIG_NAME: &str = "better_replays";

/// How the free-look input behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreeLookMode {
    /// Active while the input is held.
    #[default]
    Hold,
    /// Each press flips free-look on or off.
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub player_position_smoothing: f32,
    pub push_back_speed: f32,
    pub free_look_orbital_lerp_speed: f32,
    pub free_look_exit_position_lerp_speed: f32,
    pub free_look_exit_rotation_lerp_speed: f32,
    pub min_camera_distance: f32,
    /// Seconds.
    pub free_look_transition_duration: f32,
    pub first_person_rotation_lerp_speed: f32,
    pub camera_offset_height: f32,
    pub initial_camera_distance: f32,
    /// Degrees.
    pub first_person_pitch_limit: f32,
    pub free_look_pitch_min: f32,
    pub free_look_pitch_max: f32,
    pub zoom_min_distance: f32,
    pub zoom_max_distance: f32,
    pub zoom_default_distance: f32,
    pub lerp_speed_at_min_zoom: f32,
    pub lerp_speed_at_max_zoom: f32,
    pub lerp_speed_at_default_zoom: f32,
    pub goal_to_player_rotation_lerp_speed: f32,

    pub toggle_camera_key: String,
    pub free_look_key: String,

    pub free_look_mode: FreeLookMode,
    pub remember_camera_state: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            player_position_smoothing: 0.3,
            push_back_speed: 0.01,
            free_look_orbital_lerp_speed: 0.05,
            free_look_exit_position_lerp_speed: 0.1,
            free_look_exit_rotation_lerp_speed: 0.15,
            min_camera_distance: 2.0,
            free_look_transition_duration: 0.5,
            first_person_rotation_lerp_speed: 0.1,
            camera_offset_height: 0.5,
            initial_camera_distance: 3.0,
            first_person_pitch_limit: 90.0,
            free_look_pitch_min: -20.0,
            free_look_pitch_max: 80.0,
            zoom_min_distance: 0.2,
            zoom_max_distance: 16.0,
            zoom_default_distance: 1.0,
            lerp_speed_at_min_zoom: 0.1,
            lerp_speed_at_max_zoom: 0.01,
            lerp_speed_at_default_zoom: 0.02,
            goal_to_player_rotation_lerp_speed: 0.05,
            toggle_camera_key: "c".into(),
            free_look_key: "rightButton".into(),
            free_look_mode: FreeLookMode::Hold,
            remember_camera_state: false,
        }
    }
}

const CAMERA_HEADING: &str = "Camera Settings\nThese control camera movement and behavior";

const KEYBIND_HEADING: &str = "Keybind Settings
Key bindings for camera controls
Valid keys: a-z, digit0-digit9, f1-f12,
            space, tab, enter, escape, backspace, delete, insert, home, end, pageUp, pageDown,
            upArrow, downArrow, leftArrow, rightArrow, leftShift, rightShift, leftCtrl, rightCtrl,
            leftAlt, rightAlt, leftMeta, rightMeta, capsLock, numLock, scrollLock, printScreen,
            pause, numpad0-numpad9, numpadDivide, numpadMultiply, numpadMinus, numpadPlus,
            numpadEnter, numpadPeriod, semicolon, comma, period, slash, backslash,
            leftBracket, rightBracket, quote, backquote, minus, equals
Valid mouse buttons: leftButton, rightButton, middleButton, forwardButton, backButton";

const MISC_HEADING: &str = "Misc Settings\nGeneral behavior settings";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::float("player_position_smoothing", 0.3, 0.0, 100.0)
        .doc("Player position smoothing factor")
        .heading(CAMERA_HEADING),
    FieldSpec::float("push_back_speed", 0.01, 0.0, 100.0)
        .doc("Speed for pushing the camera back when too close"),
    FieldSpec::float("free_look_orbital_lerp_speed", 0.05, 0.0, 100.0)
        .doc("Free look orbital movement smoothing"),
    FieldSpec::float("free_look_exit_position_lerp_speed", 0.1, 0.0, 100.0)
        .doc("Position lerp speed when exiting free look"),
    FieldSpec::float("free_look_exit_rotation_lerp_speed", 0.15, 0.0, 100.0)
        .doc("Rotation lerp speed when exiting free look"),
    FieldSpec::float("min_camera_distance", 2.0, 0.0, 100.0)
        .doc("Minimum distance the camera keeps from the player"),
    FieldSpec::float("free_look_transition_duration", 0.5, 0.0, 100.0)
        .doc("Seconds to transition into free look"),
    FieldSpec::float("first_person_rotation_lerp_speed", 0.1, 0.0, 100.0)
        .doc("First person rotation smoothing"),
    FieldSpec::float("camera_offset_height", 0.5, -100.0, 100.0)
        .doc("Height offset for the third person camera"),
    FieldSpec::float("initial_camera_distance", 3.0, 0.0, 100.0)
        .doc("Camera distance behind the scorer when the replay starts"),
    FieldSpec::float("first_person_pitch_limit", 90.0, 0.0, 90.0)
        .doc("Maximum pitch angle in first person"),
    FieldSpec::float("free_look_pitch_min", -20.0, -90.0, 90.0)
        .doc("Minimum pitch angle in free look"),
    FieldSpec::float("free_look_pitch_max", 80.0, -90.0, 90.0)
        .doc("Maximum pitch angle in free look"),
    FieldSpec::float("zoom_min_distance", 0.2, 0.0, 100.0).doc("Minimum zoom distance"),
    FieldSpec::float("zoom_max_distance", 16.0, 0.0, 1000.0).doc("Maximum zoom distance"),
    FieldSpec::float("zoom_default_distance", 1.0, 0.0, 100.0).doc("Default zoom distance"),
    FieldSpec::float("lerp_speed_at_min_zoom", 0.1, 0.0, 100.0)
        .doc("Camera lerp speed when zoomed in closest"),
    FieldSpec::float("lerp_speed_at_max_zoom", 0.01, 0.0, 100.0)
        .doc("Camera lerp speed when zoomed out farthest"),
    FieldSpec::float("lerp_speed_at_default_zoom", 0.02, 0.0, 100.0)
        .doc("Camera lerp speed at default zoom"),
    FieldSpec::float("goal_to_player_rotation_lerp_speed", 0.05, 0.0, 100.0)
        .doc("Rotation lerp speed for the goal-to-player transition"),
    FieldSpec::text("toggle_camera_key", "c", InputBinding::is_valid_name)
        .doc("Key or mouse button to toggle between first and third person")
        .heading(KEYBIND_HEADING),
    FieldSpec::text("free_look_key", "rightButton", InputBinding::is_valid_name)
        .doc("Key or mouse button for free look"),
    FieldSpec::text("free_look_mode", "hold", |mode| mode == "hold" || mode == "toggle")
        .doc("Free look input mode, \"hold\" or \"toggle\"")
        .heading(MISC_HEADING),
    FieldSpec::boolean("remember_camera_state", false)
        .doc("Remember camera mode and zoom between replays"),
];

impl Settings for CameraConfig {
    const NAME: &'static str = "replay camera";

    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }
}

impl CameraConfig {
    /// Open the config document at `path`, falling back to defaults if the
    /// file cannot be read or written. The returned file handle is used for
    /// hot reloading.
    pub fn load_or_default(path: impl Into<PathBuf>) -> (Self, Option<SettingsFile<Self>>) {
        let path = path.into();
        match SettingsFile::<Self>::open(&path) {
            Ok(file) => (file.value().clone(), Some(file)),
            Err(err) => {
                error!(
                    path = %path.display(),
                    "failed to load replay camera config: {err}. Using defaults."
                );
                (Self::default(), None)
            }
        }
    }

    pub fn bindings(&self) -> Bindings {
        let defaults = Bindings::default();
        Bindings {
            toggle_camera: resolve(&self.toggle_camera_key, defaults.toggle_camera),
            free_look: resolve(&self.free_look_key, defaults.free_look),
        }
    }

    /// Zoom bounds, ordered and never negative.
    pub fn zoom_range(&self) -> (f32, f32) {
        let max = self.zoom_max_distance.max(0.0);
        (self.zoom_min_distance.clamp(0.0, max), max)
    }

    /// Starting zoom distance for a fresh session.
    pub fn initial_zoom(&self) -> f32 {
        let (min, max) = self.zoom_range();
        self.zoom_default_distance.clamp(min, max)
    }
}

fn resolve(name: &str, fallback: InputBinding) -> InputBinding {
    name.parse().unwrap_or_else(|err| {
        warn!("{err}, using '{fallback}'");
        fallback
    })
}
