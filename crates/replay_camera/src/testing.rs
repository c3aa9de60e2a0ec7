//! In-memory collaborators for unit tests.

use crate::rig::{
    BodyPart, CameraSink, Label, Pose, PoseSource, ScorerRig, TrackingTarget, VisibilitySink,
};
use bevy::math::{Quat, Vec3};
use std::collections::HashMap;

pub const EYE_HEIGHT: f32 = 0.7;
pub const HEAD_HEIGHT: f32 = 0.6;

pub struct FakeScorer {
    pub eye: Option<Pose>,
    pub head: Option<Pose>,
    pub visible: HashMap<BodyPart, bool>,
    pub username_opacity: f32,
    pub number_opacity: f32,
}

impl FakeScorer {
    /// Player at `position`, looking along -Z.
    pub fn standing_at(position: Vec3) -> Self {
        Self {
            eye: Some(Pose::new(position + Vec3::Y * EYE_HEIGHT, Quat::IDENTITY)),
            head: Some(Pose::new(position + Vec3::Y * HEAD_HEIGHT, Quat::IDENTITY)),
            visible: BodyPart::ALL.iter().map(|part| (*part, true)).collect(),
            username_opacity: 1.0,
            number_opacity: 1.0,
        }
    }

    pub fn head_position(&self) -> Vec3 {
        self.head.map(|pose| pose.position).unwrap_or_default()
    }

    pub fn body_visible(&self) -> bool {
        self.visible.values().all(|visible| *visible)
    }

    pub fn body_hidden(&self) -> bool {
        self.visible.values().all(|visible| !*visible)
    }
}

impl VisibilitySink for FakeScorer {
    fn set_body_part_visible(&mut self, part: BodyPart, visible: bool) {
        self.visible.insert(part, visible);
    }

    fn label_opacity(&self, label: Label) -> f32 {
        match label {
            Label::Username => self.username_opacity,
            Label::Number => self.number_opacity,
        }
    }

    fn set_label_opacity(&mut self, label: Label, opacity: f32) {
        match label {
            Label::Username => self.username_opacity = opacity,
            Label::Number => self.number_opacity = opacity,
        }
    }
}

impl ScorerRig for FakeScorer {
    fn eye(&self) -> &dyn PoseSource {
        &self.eye
    }

    fn head(&self) -> &dyn PoseSource {
        &self.head
    }
}

pub struct FakeCamera {
    pub pose: Option<Pose>,
    pub tracking: Option<TrackingTarget>,
    pub supports_tracking: bool,
    pub field_of_view: f32,
    pub writes: usize,
}

impl Default for FakeCamera {
    fn default() -> Self {
        Self {
            pose: Some(Pose::IDENTITY),
            tracking: None,
            supports_tracking: true,
            field_of_view: 0.0,
            writes: 0,
        }
    }
}

impl FakeCamera {
    pub fn at(position: Vec3, rotation: Quat) -> Self {
        Self {
            pose: Some(Pose::new(position, rotation)),
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pose.map(|pose| pose.position).unwrap_or_default()
    }

    pub fn rotation(&self) -> Quat {
        self.pose.map(|pose| pose.rotation).unwrap_or_default()
    }
}

impl CameraSink for FakeCamera {
    fn pose(&self) -> Option<Pose> {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = Some(pose);
        self.writes += 1;
    }

    fn supports_tracking(&self) -> bool {
        self.supports_tracking
    }

    fn set_tracking_target(&mut self, target: Option<TrackingTarget>) {
        self.tracking = target;
    }

    fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees;
    }
}
