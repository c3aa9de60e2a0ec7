//! Replay camera controller for goal replays.
//!
//! [`CameraSession`] is a per-frame state machine that blends person mode,
//! free-look, zoom, the post-goal rotation transition and target tracking
//! into one camera pose per tick. It talks to the host only through the
//! collaborator traits in [`rig`] and the [`FrameInput`] snapshot, so it can
//! be driven by hand or through [`ReplayCameraPlugin`].

pub mod config;
mod controller;
mod error;
mod input;
mod math;
pub mod plugin;
pub mod rig;
mod session;
#[cfg(test)]
mod testing;
mod timeline;

pub use config::{Bindings, CameraConfig, FreeLookMode, InputBinding};
pub use controller::{CameraPose, TickOutcome, LOG_THROTTLE_TICKS};
pub use error::{CameraError, Dependency, UnknownBinding};
pub use input::{FrameInput, InputSource};
pub use plugin::ReplayCameraPlugin;
pub use rig::{
    BodyPart, CameraSink, Label, Pose, PoseSource, ReplayRig, ScorerRig, TrackingTarget,
    VisibilitySink,
};
pub use session::{CameraMemory, CameraSession, PersonMode};
pub use timeline::{
    ReplayTimeline, TimelineEvent, GOAL_SCORED_DELAY, REPLAY_LIFETIME, SCORER_ATTACH_DELAY,
};
