//! Collaborator interfaces the controller reads from and writes to.
//!
//! Readers return `None` when the object behind them is gone; the controller
//! treats that as a stale reference and skips the tick.

use bevy::math::{Quat, Vec3};

/// World-space position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

pub trait PoseSource {
    fn world_position(&self) -> Option<Vec3>;
    fn world_rotation(&self) -> Option<Quat>;

    fn forward(&self) -> Option<Vec3> {
        self.world_rotation().map(|rotation| rotation * Vec3::NEG_Z)
    }

    fn pose(&self) -> Option<Pose> {
        Some(Pose::new(self.world_position()?, self.world_rotation()?))
    }
}

impl PoseSource for Pose {
    fn world_position(&self) -> Option<Vec3> {
        Some(self.position)
    }

    fn world_rotation(&self) -> Option<Quat> {
        Some(self.rotation)
    }
}

impl PoseSource for Option<Pose> {
    fn world_position(&self) -> Option<Vec3> {
        self.map(|pose| pose.position)
    }

    fn world_rotation(&self) -> Option<Quat> {
        self.map(|pose| pose.rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Groin,
    Torso,
    Head,
}

impl BodyPart {
    pub const ALL: [BodyPart; 3] = [BodyPart::Groin, BodyPart::Torso, BodyPart::Head];
}

/// Floating name tags above a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Username,
    Number,
}

/// Rendered representation of the scorer.
pub trait VisibilitySink {
    fn set_body_part_visible(&mut self, part: BodyPart, visible: bool);
    fn label_opacity(&self, label: Label) -> f32;
    fn set_label_opacity(&mut self, label: Label, opacity: f32);
}

/// The player who scored: the eye is the player's own camera, the head is
/// the rendered head used as the third-person focus.
pub trait ScorerRig: VisibilitySink {
    fn eye(&self) -> &dyn PoseSource;
    fn head(&self) -> &dyn PoseSource;
}

/// What the host camera should keep in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingTarget {
    /// The scorer's eye.
    Scorer,
    Goal,
}

pub trait CameraSink {
    fn pose(&self) -> Option<Pose>;
    fn set_pose(&mut self, pose: Pose);
    fn supports_tracking(&self) -> bool;
    fn set_tracking_target(&mut self, target: Option<TrackingTarget>);
    fn set_field_of_view(&mut self, degrees: f32);
}

/// Everything one tick needs, borrowed from the host. Any of the three may be
/// absent while the replay is still being set up.
#[derive(Default)]
pub struct ReplayRig<'a> {
    pub scorer: Option<&'a mut dyn ScorerRig>,
    pub goal: Option<&'a dyn PoseSource>,
    pub camera: Option<&'a mut dyn CameraSink>,
}
