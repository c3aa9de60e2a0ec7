//! ECS views implementing the controller's collaborator traits.

use super::components::{PlayerRig, ReplayCamera, ScorerPresentation};
use crate::config::InputBinding;
use crate::input::InputSource;
use crate::rig::{
    BodyPart, CameraSink, Label, Pose, PoseSource, ScorerRig, TrackingTarget, VisibilitySink,
};
use bevy::ecs::system::SystemParam;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;

impl From<&GlobalTransform> for Pose {
    fn from(transform: &GlobalTransform) -> Self {
        Pose::new(transform.translation(), transform.rotation())
    }
}

/// Keyboard and mouse state. Every resource is optional so the plugin runs
/// in hosts without an input plugin.
#[derive(SystemParam)]
pub(crate) struct DeviceInput<'w> {
    keys: Option<Res<'w, ButtonInput<KeyCode>>>,
    buttons: Option<Res<'w, ButtonInput<MouseButton>>>,
    motion: Option<Res<'w, AccumulatedMouseMotion>>,
    scroll: Option<Res<'w, AccumulatedMouseScroll>>,
}

impl InputSource for DeviceInput<'_> {
    fn just_pressed(&self, binding: InputBinding) -> bool {
        match binding {
            InputBinding::Key(key) => self
                .keys
                .as_ref()
                .is_some_and(|keys| keys.just_pressed(key)),
            InputBinding::Mouse(button) => self
                .buttons
                .as_ref()
                .is_some_and(|buttons| buttons.just_pressed(button)),
        }
    }

    fn just_released(&self, binding: InputBinding) -> bool {
        match binding {
            InputBinding::Key(key) => self
                .keys
                .as_ref()
                .is_some_and(|keys| keys.just_released(key)),
            InputBinding::Mouse(button) => self
                .buttons
                .as_ref()
                .is_some_and(|buttons| buttons.just_released(button)),
        }
    }

    fn mouse_delta(&self) -> Vec2 {
        self.motion
            .as_ref()
            .map(|motion| motion.delta)
            .unwrap_or_default()
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll
            .as_ref()
            .map(|scroll| scroll.delta.y)
            .unwrap_or_default()
    }
}

/// The replay camera entity. `None` once the entity is gone.
pub(crate) struct CameraHandle<'w> {
    parts: Option<(Mut<'w, Transform>, Mut<'w, ReplayCamera>)>,
}

impl<'w> CameraHandle<'w> {
    pub fn new(parts: Option<(Mut<'w, Transform>, Mut<'w, ReplayCamera>)>) -> Self {
        Self { parts }
    }
}

impl CameraSink for CameraHandle<'_> {
    fn pose(&self) -> Option<Pose> {
        self.parts
            .as_ref()
            .map(|(transform, _)| Pose::new(transform.translation, transform.rotation))
    }

    fn set_pose(&mut self, pose: Pose) {
        if let Some((transform, _)) = self.parts.as_mut() {
            transform.translation = pose.position;
            transform.rotation = pose.rotation;
        }
    }

    fn supports_tracking(&self) -> bool {
        self.parts
            .as_ref()
            .is_some_and(|(_, camera)| camera.supports_tracking)
    }

    fn set_tracking_target(&mut self, target: Option<TrackingTarget>) {
        if let Some((_, camera)) = self.parts.as_mut() {
            if camera.tracking != target {
                camera.tracking = target;
            }
        }
    }

    fn set_field_of_view(&mut self, degrees: f32) {
        if let Some((_, camera)) = self.parts.as_mut() {
            camera.field_of_view = degrees;
        }
    }
}

/// The scorer's eye and head poses, sampled when the handle is built, plus
/// its presentation component.
pub(crate) struct ScorerHandle<'w> {
    eye: Option<Pose>,
    head: Option<Pose>,
    presentation: Option<Mut<'w, ScorerPresentation>>,
}

impl<'w> ScorerHandle<'w> {
    pub fn new(
        rig: Option<PlayerRig>,
        poses: &Query<&GlobalTransform>,
        presentation: Option<Mut<'w, ScorerPresentation>>,
    ) -> Self {
        let pose_of = |entity: Entity| poses.get(entity).ok().map(Pose::from);
        Self {
            eye: rig.and_then(|rig| pose_of(rig.eye)),
            head: rig.and_then(|rig| pose_of(rig.head)),
            presentation,
        }
    }
}

impl VisibilitySink for ScorerHandle<'_> {
    fn set_body_part_visible(&mut self, part: BodyPart, visible: bool) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        match part {
            BodyPart::Groin => presentation.groin_visible = visible,
            BodyPart::Torso => presentation.torso_visible = visible,
            BodyPart::Head => presentation.head_visible = visible,
        }
    }

    fn label_opacity(&self, label: Label) -> f32 {
        self.presentation
            .as_ref()
            .map_or(1.0, |presentation| match label {
                Label::Username => presentation.username_opacity,
                Label::Number => presentation.number_opacity,
            })
    }

    fn set_label_opacity(&mut self, label: Label, opacity: f32) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        match label {
            Label::Username => presentation.username_opacity = opacity,
            Label::Number => presentation.number_opacity = opacity,
        }
    }
}

impl ScorerRig for ScorerHandle<'_> {
    fn eye(&self) -> &dyn PoseSource {
        &self.eye
    }

    fn head(&self) -> &dyn PoseSource {
        &self.head
    }
}
