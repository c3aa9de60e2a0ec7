//! Per-tick camera state machine.
//!
//! Each tick evaluates, in order: mode toggle, zoom, free-look entry/exit,
//! target selection and finally the pose for the active person mode. A tick
//! with a missing or stale collaborator changes nothing on the camera.

mod first_person;
mod third_person;

use crate::config::FreeLookMode;
use crate::error::{CameraError, Dependency};
use crate::input::FrameInput;
use crate::math::{clamp_between, wrap_degrees, yaw_pitch_from_rotation};
use crate::rig::{ReplayRig, TrackingTarget};
use crate::session::{CameraSession, FreeLook, PersonMode, Transition};
use bevy::math::{Quat, Vec2, Vec3};
use tracing::{debug, error, info, warn};

/// Skipped ticks of one kind between two diagnostics.
pub const LOG_THROTTLE_TICKS: u64 = 300;

/// Scroll multiplies the zoom distance by these per tick.
const ZOOM_IN_FACTOR: f32 = 0.9;
const ZOOM_OUT_FACTOR: f32 = 1.1;

/// Pose written to the camera by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub tracking: Option<TrackingTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Applied(CameraPose),
    /// Nothing was written; the camera keeps its previous pose.
    Skipped(CameraError),
}

impl TickOutcome {
    pub fn pose(&self) -> Option<&CameraPose> {
        match self {
            TickOutcome::Applied(pose) => Some(pose),
            TickOutcome::Skipped(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CameraError> {
        match self {
            TickOutcome::Applied(_) => None,
            TickOutcome::Skipped(err) => Some(err),
        }
    }
}

/// Rate limit for skip diagnostics, counted per error kind.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogThrottle {
    skipped: [u64; 3],
}

impl LogThrottle {
    /// Counts one skipped tick; true on the first and then every
    /// [`LOG_THROTTLE_TICKS`]th one.
    pub fn should_log(&mut self, err: &CameraError) -> bool {
        let count = &mut self.skipped[err.kind()];
        let log = *count % LOG_THROTTLE_TICKS == 0;
        *count += 1;
        log
    }
}

impl CameraSession {
    /// Advance the camera by one tick of `dt` seconds.
    ///
    /// Never fails: problems are reported as [`TickOutcome::Skipped`] and
    /// logged at most once per [`LOG_THROTTLE_TICKS`] occurrences.
    pub fn advance(&mut self, dt: f32, input: &FrameInput, rig: ReplayRig<'_>) -> TickOutcome {
        match self.step(dt, input, rig) {
            Ok(pose) => TickOutcome::Applied(pose),
            Err(err) => {
                if self.throttle.should_log(&err) {
                    match err {
                        CameraError::MissingDependency(_) => {
                            warn!("{err}, skipping camera update")
                        }
                        _ => error!("{err}, skipping camera update"),
                    }
                }
                TickOutcome::Skipped(err)
            }
        }
    }

    fn step(
        &mut self,
        dt: f32,
        input: &FrameInput,
        rig: ReplayRig<'_>,
    ) -> Result<CameraPose, CameraError> {
        let (scorer, goal, camera) = match (rig.scorer, rig.goal, rig.camera) {
            (Some(scorer), Some(goal), Some(camera)) => (scorer, goal, camera),
            (scorer, goal, camera) => {
                let mut missing = Vec::new();
                if scorer.is_none() {
                    missing.push(Dependency::Scorer);
                }
                if camera.is_none() {
                    missing.push(Dependency::Camera);
                }
                if goal.is_none() {
                    missing.push(Dependency::Goal);
                }
                return Err(CameraError::MissingDependency(missing));
            }
        };
        let current = camera
            .pose()
            .ok_or(CameraError::StaleReference("replay camera"))?;

        if input.toggle_pressed {
            self.mode.toggle();
            info!(mode = ?self.mode, "camera mode switched");
            self.remember();
        }

        if self.mode == PersonMode::ThirdPerson && input.scroll != 0.0 {
            let factor = if input.scroll > 0.0 {
                ZOOM_IN_FACTOR
            } else {
                ZOOM_OUT_FACTOR
            };
            let (min, max) = self.config.zoom_range();
            self.zoom_distance = (self.zoom_distance * factor).clamp(min, max);
            self.remember();
        }

        self.handle_free_look_input(input, current.rotation);

        if !camera.supports_tracking() {
            return Err(CameraError::UnsupportedCamera);
        }
        let tracking = self.tracking_target();

        let eye = scorer
            .eye()
            .pose()
            .ok_or(CameraError::StaleReference("scorer eye"))?;

        let pose = match self.mode {
            PersonMode::FirstPerson => self.first_person(eye, current, input),
            PersonMode::ThirdPerson => {
                self.third_person(dt, input, eye, current, scorer.head(), goal)?
            }
        };

        camera.set_pose(pose);
        camera.set_tracking_target(tracking);
        match self.mode {
            PersonMode::FirstPerson => Self::hide_scorer(scorer),
            PersonMode::ThirdPerson => self.show_scorer(scorer),
        }

        Ok(CameraPose {
            position: pose.position,
            rotation: pose.rotation,
            tracking,
        })
    }

    fn handle_free_look_input(&mut self, input: &FrameInput, current_rotation: Quat) {
        match self.config.free_look_mode {
            FreeLookMode::Hold => {
                if input.free_look_pressed {
                    self.enter_free_look(current_rotation);
                }
                if input.free_look_released && self.free_look.active {
                    self.exit_free_look();
                }
            }
            FreeLookMode::Toggle => {
                if input.free_look_pressed {
                    if self.free_look.active {
                        self.exit_free_look();
                    } else {
                        self.enter_free_look(current_rotation);
                    }
                }
            }
        }
    }

    fn enter_free_look(&mut self, rotation: Quat) {
        let (yaw, pitch) = yaw_pitch_from_rotation(rotation);
        let mut transition = Transition::default();
        transition.start(rotation);
        self.free_look = FreeLook {
            active: true,
            yaw,
            pitch,
            transition,
            exiting: false,
        };
        self.cursor_locked = true;
        debug!(yaw, pitch, "free look started");
    }

    fn exit_free_look(&mut self) {
        self.free_look.active = false;
        self.free_look.transition.stop();
        self.free_look.exiting = true;
        self.cursor_locked = false;
        debug!("free look ended");
    }

    fn tracking_target(&self) -> Option<TrackingTarget> {
        match self.mode {
            PersonMode::FirstPerson => None,
            PersonMode::ThirdPerson if self.goal_scored || self.free_look.active => {
                Some(TrackingTarget::Scorer)
            }
            PersonMode::ThirdPerson => Some(TrackingTarget::Goal),
        }
    }

    /// Integrate pointer movement into free-look yaw/pitch, clamping pitch.
    fn integrate_look(&mut self, delta: Vec2, pitch_min: f32, pitch_max: f32) {
        let look = &mut self.free_look;
        look.yaw = wrap_degrees(look.yaw - delta.x * self.look_sensitivity);
        look.pitch = clamp_between(
            look.pitch + delta.y * self.look_sensitivity,
            pitch_min,
            pitch_max,
        );
    }
}
