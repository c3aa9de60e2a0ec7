//! Mutable state of one replay.

use crate::config::{Bindings, CameraConfig};
use crate::controller::LogThrottle;
use crate::error::CameraError;
use crate::rig::{CameraSink, Label, Pose, ScorerRig};
use bevy::math::{Quat, Vec3};
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersonMode {
    FirstPerson,
    #[default]
    ThirdPerson,
}

impl PersonMode {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::FirstPerson => Self::ThirdPerson,
            Self::ThirdPerson => Self::FirstPerson,
        };
    }
}

/// A rotation blend that started from a captured orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Transition {
    pub active: bool,
    pub elapsed: f32,
    pub start_rotation: Quat,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            start_rotation: Quat::IDENTITY,
        }
    }
}

impl Transition {
    pub fn start(&mut self, rotation: Quat) {
        *self = Self {
            active: true,
            elapsed: 0.0,
            start_rotation: rotation,
        };
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FreeLook {
    pub active: bool,
    /// Degrees about +Y.
    pub yaw: f32,
    /// Degrees, positive looks down.
    pub pitch: f32,
    pub transition: Transition,
    /// Set when free-look ends; the third-person camera uses the exit lerp
    /// speeds until it has settled on its tracking pose again.
    pub exiting: bool,
}

/// Exponentially smoothed copy of the scorer's head position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TrackingPoint {
    pub smoothed: Vec3,
    pub last: Option<Vec3>,
}

impl TrackingPoint {
    /// Feed the latest head position. The first observation snaps.
    pub fn observe(&mut self, position: Vec3, smoothing: f32) -> Vec3 {
        self.smoothed = match self.last {
            None => position,
            Some(_) => self.smoothed.lerp(position, smoothing.clamp(0.0, 1.0)),
        };
        self.last = Some(position);
        self.smoothed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LabelOpacity {
    pub username: f32,
    pub number: f32,
}

impl Default for LabelOpacity {
    fn default() -> Self {
        Self {
            username: 1.0,
            number: 1.0,
        }
    }
}

/// Person mode and zoom carried from one replay to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMemory {
    pub person_mode: PersonMode,
    pub zoom_distance: f32,
}

/// State of the replay camera for one replay.
///
/// Created when a replay begins and dropped when it ends. The scorer, goal
/// and camera are not owned; they are lent to every
/// [`advance`](CameraSession::advance) call through a
/// [`ReplayRig`](crate::ReplayRig).
#[derive(Debug, Clone)]
pub struct CameraSession {
    pub(crate) config: CameraConfig,
    pub(crate) bindings: Bindings,
    /// Degrees per pointer unit.
    pub(crate) look_sensitivity: f32,
    pub(crate) mode: PersonMode,
    pub(crate) free_look: FreeLook,
    pub(crate) zoom_distance: f32,
    pub(crate) goal_scored: bool,
    pub(crate) post_goal: Transition,
    pub(crate) post_goal_started: bool,
    pub(crate) tracking: TrackingPoint,
    pub(crate) labels: LabelOpacity,
    pub(crate) cursor_locked: bool,
    pub(crate) remembered: Option<CameraMemory>,
    pub(crate) throttle: LogThrottle,
}

impl CameraSession {
    pub fn new(config: CameraConfig, look_sensitivity: f32) -> Self {
        Self {
            bindings: config.bindings(),
            zoom_distance: config.initial_zoom(),
            config,
            look_sensitivity,
            mode: PersonMode::default(),
            free_look: FreeLook::default(),
            goal_scored: false,
            post_goal: Transition::default(),
            post_goal_started: false,
            tracking: TrackingPoint::default(),
            labels: LabelOpacity::default(),
            cursor_locked: false,
            remembered: None,
            throttle: LogThrottle::default(),
        }
    }

    /// Start a session from the previous replay's mode and zoom, if the
    /// config asks for it.
    pub fn resume(
        config: CameraConfig,
        look_sensitivity: f32,
        memory: Option<CameraMemory>,
    ) -> Self {
        let mut session = Self::new(config, look_sensitivity);
        if let (true, Some(memory)) = (session.config.remember_camera_state, memory) {
            let (min, max) = session.config.zoom_range();
            session.mode = memory.person_mode;
            session.zoom_distance = memory.zoom_distance.clamp(min, max);
            session.remember();
            debug!(mode = ?session.mode, zoom = session.zoom_distance, "restored camera state");
        }
        session
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Swap in a reloaded config. Zoom is re-clamped to the new bounds.
    pub fn set_config(&mut self, config: CameraConfig) {
        let (min, max) = config.zoom_range();
        self.zoom_distance = self.zoom_distance.clamp(min, max);
        self.bindings = config.bindings();
        self.config = config;
    }

    pub fn bindings(&self) -> Bindings {
        self.bindings
    }

    pub fn set_look_sensitivity(&mut self, degrees_per_unit: f32) {
        self.look_sensitivity = degrees_per_unit;
    }

    pub fn person_mode(&self) -> PersonMode {
        self.mode
    }

    pub fn is_free_look(&self) -> bool {
        self.free_look.active
    }

    /// Free-look yaw and pitch in degrees; positive pitch looks down.
    pub fn free_look_angles(&self) -> (f32, f32) {
        (self.free_look.yaw, self.free_look.pitch)
    }

    pub fn zoom_distance(&self) -> f32 {
        self.zoom_distance
    }

    pub fn goal_scored(&self) -> bool {
        self.goal_scored
    }

    pub fn post_goal_transition_active(&self) -> bool {
        self.post_goal.active
    }

    /// `None` until the third-person camera has seen the scorer once.
    pub fn smoothed_player_position(&self) -> Option<Vec3> {
        self.tracking.last.map(|_| self.tracking.smoothed)
    }

    /// Whether the pointer should be locked to the window.
    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Mode and zoom to carry into the next replay. Only set while
    /// `remember_camera_state` is on.
    pub fn remembered_state(&self) -> Option<CameraMemory> {
        self.remembered
    }

    pub fn set_goal_scored(&mut self, scored: bool) {
        if scored && !self.goal_scored {
            info!("goal scored flag set, camera will now target the goal scorer");
        }
        self.goal_scored = scored;
    }

    /// Configure the replay camera. Places it behind the scorer when the
    /// scorer is already known.
    pub fn attach_camera(
        &mut self,
        camera: &mut dyn CameraSink,
        scorer: Option<&dyn ScorerRig>,
        field_of_view: f32,
    ) {
        camera.set_field_of_view(field_of_view);
        info!(field_of_view, "replay camera configured");
        if let Some(scorer) = scorer {
            self.place_behind_scorer(camera, scorer);
        }
    }

    /// Remember the scorer's label opacities and place the camera behind the
    /// scorer when the camera is already known.
    pub fn attach_scorer(&mut self, scorer: &dyn ScorerRig, camera: Option<&mut dyn CameraSink>) {
        self.labels = LabelOpacity {
            username: scorer.label_opacity(Label::Username),
            number: scorer.label_opacity(Label::Number),
        };
        if let Some(camera) = camera {
            self.place_behind_scorer(camera, scorer);
        }
    }

    fn place_behind_scorer(&self, camera: &mut dyn CameraSink, scorer: &dyn ScorerRig) {
        let Some(eye) = scorer.eye().pose() else {
            error!(
                "failed to initialize camera position: {}",
                CameraError::StaleReference("scorer eye")
            );
            return;
        };
        let position = eye.position - eye.forward() * self.config.initial_camera_distance;
        camera.set_pose(Pose::new(position, eye.rotation));
        debug!(?position, "camera placed behind goal scorer");
    }

    pub(crate) fn remember(&mut self) {
        if self.config.remember_camera_state {
            self.remembered = Some(CameraMemory {
                person_mode: self.mode,
                zoom_distance: self.zoom_distance,
            });
        }
    }
}
