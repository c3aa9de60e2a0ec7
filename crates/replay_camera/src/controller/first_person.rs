use crate::input::FrameInput;
use crate::math::{blend_rotation, rotation_from_yaw_pitch};
use crate::rig::{BodyPart, Label, Pose, ScorerRig};
use crate::session::CameraSession;

impl CameraSession {
    /// Camera sits in the scorer's eye. Free-look steers it directly,
    /// otherwise it eases toward the eye's orientation.
    pub(super) fn first_person(&mut self, eye: Pose, current: Pose, input: &FrameInput) -> Pose {
        self.free_look.exiting = false;

        let rotation = if self.free_look.active {
            let limit = self.config.first_person_pitch_limit;
            self.integrate_look(input.mouse_delta, -limit, limit);
            let (yaw, pitch) = self.free_look_angles();
            rotation_from_yaw_pitch(yaw, pitch)
        } else {
            blend_rotation(
                current.rotation,
                eye.rotation,
                self.config.first_person_rotation_lerp_speed,
            )
        };

        Pose::new(eye.position, rotation)
    }

    pub(super) fn hide_scorer(scorer: &mut dyn ScorerRig) {
        for part in BodyPart::ALL {
            scorer.set_body_part_visible(part, false);
        }
        scorer.set_label_opacity(Label::Username, 0.0);
        scorer.set_label_opacity(Label::Number, 0.0);
    }
}
