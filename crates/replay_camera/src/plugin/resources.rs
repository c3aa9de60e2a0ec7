use super::components::PlayerIdentity;
use crate::config::CameraConfig;
use crate::session::{CameraMemory, CameraSession};
use crate::timeline::ReplayTimeline;
use bevy::prelude::*;
use settings::SettingsFile;
use tracing::{error, info};

/// The camera config and, when file-backed, its document on disk.
#[derive(Resource)]
pub struct ReplayCameraSettings {
    file: Option<SettingsFile<CameraConfig>>,
    current: CameraConfig,
}

impl ReplayCameraSettings {
    pub fn new(current: CameraConfig, file: Option<SettingsFile<CameraConfig>>) -> Self {
        Self { file, current }
    }

    pub fn current(&self) -> &CameraConfig {
        &self.current
    }

    /// Re-read the document if its modification time changed.
    pub fn reload_if_changed(&mut self) -> Option<&CameraConfig> {
        let file = self.file.as_mut()?;
        match file.reload_if_changed() {
            Ok(Some(config)) => {
                self.current = config.clone();
                info!(path = %file.path().display(), "replay camera config reloaded");
                Some(&self.current)
            }
            Ok(None) => None,
            Err(err) => {
                error!("failed to reload replay camera config: {err}");
                None
            }
        }
    }
}

/// Values the host game owns rather than the camera config.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HostCameraSettings {
    /// Degrees per pointer unit.
    pub look_sensitivity: f32,
    /// Degrees.
    pub field_of_view: f32,
}

impl Default for HostCameraSettings {
    fn default() -> Self {
        Self {
            look_sensitivity: 0.12,
            field_of_view: 90.0,
        }
    }
}

/// What the host told us before the replay started, plus state carried
/// between replays.
#[derive(Resource, Debug, Default)]
pub struct ReplayContext {
    pub scorer_identity: Option<PlayerIdentity>,
    pub scored_goal: Option<Entity>,
    pub memory: Option<CameraMemory>,
}

/// One running replay: the session plus the entities lent to it.
#[derive(Debug)]
pub struct ReplaySession {
    pub session: CameraSession,
    pub timeline: ReplayTimeline,
    pub camera: Entity,
    pub goal: Option<Entity>,
    pub scorer: Option<Entity>,
}

#[derive(Resource, Debug, Default)]
pub struct ActiveReplay(pub(crate) Option<ReplaySession>);

impl ActiveReplay {
    pub fn get(&self) -> Option<&ReplaySession> {
        self.0.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.0.is_some()
    }
}
