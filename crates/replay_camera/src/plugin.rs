//! Bevy host for [`CameraSession`](crate::CameraSession).
//!
//! The host announces the goal and the scorer through messages, then starts
//! a replay with [`ReplayStarted`]. The plugin owns the session for the
//! replay's lifetime, runs the deferred timeline and drives the camera once
//! per `Update`.

mod adapters;
mod components;
mod cursor;
mod messages;
mod resources;
mod systems;

pub use components::{
    Goal, PlayerIdentity, PlayerRig, ReplayCamera, ReplayPlayer, ScorerPresentation,
};
pub use cursor::CursorState;
pub use messages::{GoalTriggered, ReplayFinished, ReplayStarted, ScorerAnnounced};
pub use resources::{
    ActiveReplay, HostCameraSettings, ReplayCameraSettings, ReplayContext, ReplaySession,
};

use crate::config::CameraConfig;
use bevy::prelude::*;
use std::path::PathBuf;

/// Replay camera plugin.
///
/// With a config path the document is created or corrected on build and
/// reloaded whenever it changes on disk. Without one the defaults are used.
#[derive(Default)]
pub struct ReplayCameraPlugin {
    config_path: Option<PathBuf>,
}

impl ReplayCameraPlugin {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(config_path.into()),
        }
    }
}

impl Plugin for ReplayCameraPlugin {
    fn build(&self, app: &mut App) {
        let settings = match &self.config_path {
            Some(path) => {
                let (config, file) = CameraConfig::load_or_default(path.clone());
                ReplayCameraSettings::new(config, file)
            }
            None => ReplayCameraSettings::new(CameraConfig::default(), None),
        };

        app.insert_resource(settings)
            .init_resource::<HostCameraSettings>()
            .init_resource::<ReplayContext>()
            .init_resource::<ActiveReplay>()
            .init_resource::<CursorState>()
            .init_resource::<cursor::HostCursor>()
            .add_message::<GoalTriggered>()
            .add_message::<ScorerAnnounced>()
            .add_message::<ReplayStarted>()
            .add_message::<ReplayFinished>()
            .add_systems(
                Update,
                (
                    systems::track_announcements,
                    systems::start_replay,
                    systems::advance_timeline,
                    systems::reload_config,
                    systems::drive_camera,
                    cursor::apply_cursor_state,
                )
                    .chain(),
            );
    }
}
