use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::input::FrameInput;
use crate::math::{
    angle_between, blend, blend_rotation, look_rotation, rotation_from_yaw_pitch,
    segment_fraction,
};
use crate::rig::{BodyPart, Label, Pose, PoseSource, ScorerRig};
use crate::session::CameraSession;
use bevy::math::{Quat, Vec3};
use tracing::debug;

/// Exit blending ends once the camera is this close to its tracking pose.
const SETTLE_DISTANCE: f32 = 0.05;
/// Degrees.
const SETTLE_ANGLE: f32 = 1.0;

/// Follow speed for the current zoom: eases from the min-zoom speed to the
/// default speed, then from the default speed to the max-zoom speed.
pub(crate) fn lerp_speed_for_zoom(config: &CameraConfig, zoom: f32) -> f32 {
    let (min, max) = config.zoom_range();
    let default = config.initial_zoom();
    if zoom <= default {
        let t = segment_fraction(zoom, min, default);
        lerp(config.lerp_speed_at_min_zoom, config.lerp_speed_at_default_zoom, t)
    } else {
        let t = segment_fraction(zoom, default, max);
        lerp(config.lerp_speed_at_default_zoom, config.lerp_speed_at_max_zoom, t)
    }
}

/// Camera height shrinks to half as the zoom goes from default to max.
pub(crate) fn height_multiplier(config: &CameraConfig, zoom: f32) -> f32 {
    let (_, max) = config.zoom_range();
    let default = config.initial_zoom();
    if zoom <= default {
        return 1.0;
    }
    lerp(1.0, 0.5, segment_fraction(zoom, default, max))
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl CameraSession {
    pub(super) fn third_person(
        &mut self,
        dt: f32,
        input: &FrameInput,
        eye: Pose,
        current: Pose,
        head: &dyn PoseSource,
        goal: &dyn PoseSource,
    ) -> Result<Pose, CameraError> {
        let head = head
            .world_position()
            .ok_or(CameraError::StaleReference("scorer head"))?;
        let goal = if self.free_look.active {
            None
        } else {
            Some(
                goal.world_position()
                    .ok_or(CameraError::StaleReference("goal"))?,
            )
        };

        let smoothed = self
            .tracking
            .observe(head, self.config.player_position_smoothing);

        Ok(match goal {
            None => self.orbit(dt, input, head, current),
            Some(goal) => self.follow(eye, current, smoothed, goal),
        })
    }

    /// Free-look: orbit the head at the zoom distance.
    fn orbit(&mut self, dt: f32, input: &FrameInput, head: Vec3, current: Pose) -> Pose {
        let (pitch_min, pitch_max) = (
            self.config.free_look_pitch_min,
            self.config.free_look_pitch_max,
        );
        self.integrate_look(input.mouse_delta, pitch_min, pitch_max);
        let (yaw, pitch) = self.free_look_angles();

        let orbit_rotation = rotation_from_yaw_pitch(yaw, pitch);
        let orbit_position = head + orbit_rotation * Vec3::Z * self.zoom_distance;
        let position = blend(
            current.position,
            orbit_position,
            self.config.free_look_orbital_lerp_speed,
        );
        let look = look_rotation(head - position, Vec3::Y).unwrap_or(orbit_rotation);

        let duration = self.config.free_look_transition_duration;
        let transition = &mut self.free_look.transition;
        let rotation = if transition.active {
            transition.elapsed += dt;
            let t = if duration <= 0.0 {
                1.0
            } else {
                (transition.elapsed / duration).clamp(0.0, 1.0)
            };
            if t >= 1.0 {
                transition.stop();
            }
            transition.start_rotation.slerp(look, t).normalize()
        } else {
            look
        };

        Pose::new(position, rotation)
    }

    /// Tracking: stay behind the scorer on the far side from the goal.
    fn follow(&mut self, eye: Pose, current: Pose, smoothed: Vec3, goal: Vec3) -> Pose {
        let zoom = self.zoom_distance;
        let away = (smoothed - goal)
            .try_normalize()
            .or_else(|| (-eye.forward()).try_normalize())
            .unwrap_or(Vec3::Z);
        let height = self.config.camera_offset_height * height_multiplier(&self.config, zoom);
        let target_position = smoothed + away * zoom + Vec3::Y * height;

        let look_at = if self.goal_scored { smoothed } else { goal };
        let target_rotation =
            look_rotation(look_at - target_position, Vec3::Y).unwrap_or(current.rotation);

        if self.goal_scored && !self.post_goal_started {
            self.post_goal_started = true;
            self.post_goal.start(current.rotation);
            debug!("post-goal rotation transition started");
        }

        let (position_speed, rotation_speed) = if self.free_look.exiting {
            (
                self.config.free_look_exit_position_lerp_speed,
                self.config.free_look_exit_rotation_lerp_speed,
            )
        } else {
            let speed = lerp_speed_for_zoom(&self.config, zoom);
            (speed, speed)
        };

        let position = blend(current.position, target_position, position_speed);
        let position = self.push_back(position, smoothed, away);

        let rotation = if self.post_goal.active {
            self.post_goal_rotation(target_rotation)
        } else {
            blend_rotation(current.rotation, target_rotation, rotation_speed)
        };

        if self.free_look.exiting
            && position.distance(target_position) < SETTLE_DISTANCE
            && angle_between(rotation, target_rotation) < SETTLE_ANGLE
        {
            self.free_look.exiting = false;
            debug!("camera settled after free look");
        }

        Pose::new(position, rotation)
    }

    fn post_goal_rotation(&mut self, target: Quat) -> Quat {
        let blended = blend_rotation(
            self.post_goal.start_rotation,
            target,
            self.config.goal_to_player_rotation_lerp_speed,
        );
        self.post_goal.start_rotation = blended;
        if angle_between(blended, target) < SETTLE_ANGLE {
            self.post_goal.stop();
            debug!("post-goal rotation transition finished");
        }
        blended
    }

    /// Ease the camera out to `min_camera_distance` when it is too close to
    /// the scorer. Disabled while zoomed in closer than that distance.
    fn push_back(&self, position: Vec3, smoothed: Vec3, fallback: Vec3) -> Vec3 {
        let min = self.config.min_camera_distance;
        if self.zoom_distance < min {
            return position;
        }
        let offset = position - smoothed;
        if offset.length() >= min {
            return position;
        }
        let direction = offset.try_normalize().unwrap_or(fallback);
        blend(position, smoothed + direction * min, self.config.push_back_speed)
    }

    pub(super) fn show_scorer(&self, scorer: &mut dyn ScorerRig) {
        for part in BodyPart::ALL {
            scorer.set_body_part_visible(part, true);
        }
        scorer.set_label_opacity(Label::Username, self.labels.username);
        scorer.set_label_opacity(Label::Number, self.labels.number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::{ReplayRig, TrackingTarget};
    use crate::testing::{FakeCamera, FakeScorer, HEAD_HEIGHT};
    use bevy::math::Vec2;

    const GOAL: Vec3 = Vec3::new(0.0, HEAD_HEIGHT, -20.0);

    fn tick(
        session: &mut CameraSession,
        input: &FrameInput,
        scorer: &mut FakeScorer,
        camera: &mut FakeCamera,
    ) -> Option<crate::CameraPose> {
        let goal = Pose::new(GOAL, Quat::IDENTITY);
        session
            .advance(
                1.0 / 60.0,
                input,
                ReplayRig {
                    scorer: Some(scorer),
                    goal: Some(&goal),
                    camera: Some(camera),
                },
            )
            .pose()
            .copied()
    }

    #[test]
    fn test_speed_curve_hits_configured_points() {
        let config = CameraConfig::default();
        assert!((lerp_speed_for_zoom(&config, 0.2) - 0.1).abs() < 1e-6);
        assert!((lerp_speed_for_zoom(&config, 1.0) - 0.02).abs() < 1e-6);
        assert!((lerp_speed_for_zoom(&config, 16.0) - 0.01).abs() < 1e-6);
        let halfway = lerp_speed_for_zoom(&config, 8.5);
        assert!((halfway - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_height_multiplier_halves_at_max_zoom() {
        let config = CameraConfig::default();
        assert_eq!(height_multiplier(&config, 0.5), 1.0);
        assert_eq!(height_multiplier(&config, 1.0), 1.0);
        assert!((height_multiplier(&config, 16.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_height_multiplier_with_default_beyond_max() {
        let config = CameraConfig {
            zoom_default_distance: 20.0,
            ..CameraConfig::default()
        };
        assert_eq!(height_multiplier(&config, 1.0), 1.0);
        assert_eq!(height_multiplier(&config, 16.0), 1.0);

        let config = CameraConfig {
            zoom_default_distance: 4.0,
            zoom_max_distance: 12.0,
            ..CameraConfig::default()
        };
        assert!((height_multiplier(&config, 8.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_converges_behind_scorer_looking_at_goal() {
        let mut session = CameraSession::new(CameraConfig::default(), 0.1);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::at(Vec3::new(5.0, 3.0, 5.0), Quat::IDENTITY);

        let head = scorer.head_position();
        let away = (head - GOAL).normalize();
        let expected = head + away + Vec3::Y * 0.5;

        let mut previous = camera.position().distance(expected);
        for _ in 0..600 {
            let pose = tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
            assert_eq!(pose.map(|p| p.tracking), Some(Some(TrackingTarget::Goal)));
            let remaining = camera.position().distance(expected);
            assert!(remaining <= previous + 1e-5);
            previous = remaining;
        }

        assert!(previous < 0.01, "camera still {previous} away");
        let to_goal = (GOAL - camera.position()).normalize();
        let forward = camera.rotation() * Vec3::NEG_Z;
        assert!(forward.dot(to_goal) > 0.999);
        assert!(scorer.body_visible());
    }

    #[test]
    fn test_push_back_violation_never_grows() {
        let mut session = CameraSession::new(CameraConfig::default(), 0.1);
        session.zoom_distance = 3.0;
        let min = session.config().min_camera_distance;
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let head = scorer.head_position();
        let away = (head - GOAL).normalize();
        let mut camera = FakeCamera::at(head + away * 0.5, Quat::IDENTITY);

        let mut violation = (min - camera.position().distance(head)).max(0.0);
        for _ in 0..300 {
            tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
            let now = (min - camera.position().distance(head)).max(0.0);
            assert!(now <= violation + 1e-5, "violation grew {violation} -> {now}");
            violation = now;
        }
        assert!(violation < 1.5);
    }

    #[test]
    fn test_push_back_disabled_when_zoomed_in() {
        let session = CameraSession::new(CameraConfig::default(), 0.1);
        let position = Vec3::new(0.0, 0.0, 0.5);
        assert_eq!(session.push_back(position, Vec3::ZERO, Vec3::Z), position);
    }

    #[test]
    fn test_goal_scored_switches_to_scorer_with_transition() {
        let mut session = CameraSession::new(CameraConfig::default(), 0.1);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::default();
        for _ in 0..10 {
            tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
        }

        session.set_goal_scored(true);
        let pose = tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);

        assert_eq!(pose.and_then(|p| p.tracking), Some(TrackingTarget::Scorer));
        assert!(session.post_goal_transition_active());

        for _ in 0..2000 {
            tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
            if !session.post_goal_transition_active() {
                break;
            }
        }
        assert!(!session.post_goal_transition_active());

        // Once finished the transition is not restarted.
        tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
        assert!(!session.post_goal_transition_active());
    }

    #[test]
    fn test_free_look_orbit_respects_pitch_bounds() {
        let mut session = CameraSession::new(CameraConfig::default(), 1.0);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::default();
        let config = session.config().clone();

        let press = FrameInput {
            free_look_pressed: true,
            ..FrameInput::default()
        };
        tick(&mut session, &press, &mut scorer, &mut camera);

        for dy in [400.0, -50.0, -1000.0, 15.0, 3000.0] {
            let input = FrameInput {
                mouse_delta: Vec2::new(10.0, dy),
                ..FrameInput::default()
            };
            let pose = tick(&mut session, &input, &mut scorer, &mut camera);
            let (_, pitch) = session.free_look_angles();
            assert!(pitch >= config.free_look_pitch_min && pitch <= config.free_look_pitch_max);
            assert_eq!(pose.and_then(|p| p.tracking), Some(TrackingTarget::Scorer));
        }
    }

    #[test]
    fn test_free_look_transition_completes_after_duration() {
        let mut session = CameraSession::new(CameraConfig::default(), 1.0);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::at(Vec3::new(0.0, 1.0, 2.0), Quat::IDENTITY);

        let press = FrameInput {
            free_look_pressed: true,
            ..FrameInput::default()
        };
        tick(&mut session, &press, &mut scorer, &mut camera);
        assert!(session.free_look.transition.active);

        // 0.5s at 60 ticks per second.
        for _ in 0..31 {
            tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
        }
        assert!(!session.free_look.transition.active);

        // Afterwards the camera looks straight at the head.
        let to_head = (scorer.head_position() - camera.position()).normalize();
        let forward = camera.rotation() * Vec3::NEG_Z;
        assert!(forward.dot(to_head) > 0.999);
    }

    #[test]
    fn test_free_look_exit_uses_exit_speed_until_settled() {
        let mut session = CameraSession::new(CameraConfig::default(), 1.0);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::default();

        let press = FrameInput {
            free_look_pressed: true,
            ..FrameInput::default()
        };
        let release = FrameInput {
            free_look_released: true,
            ..FrameInput::default()
        };
        tick(&mut session, &press, &mut scorer, &mut camera);
        for _ in 0..20 {
            let swing = FrameInput {
                mouse_delta: Vec2::new(9.0, 0.0),
                ..FrameInput::default()
            };
            tick(&mut session, &swing, &mut scorer, &mut camera);
        }
        tick(&mut session, &release, &mut scorer, &mut camera);
        assert!(session.free_look.exiting);

        for _ in 0..600 {
            tick(&mut session, &FrameInput::default(), &mut scorer, &mut camera);
            if !session.free_look.exiting {
                break;
            }
        }
        assert!(!session.free_look.exiting);
    }

    #[test]
    fn test_labels_restored_after_first_person() {
        let mut session = CameraSession::new(CameraConfig::default(), 0.1);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        scorer.username_opacity = 0.8;
        session.attach_scorer(&scorer, None);
        let mut camera = FakeCamera::default();
        let toggle = FrameInput {
            toggle_pressed: true,
            ..FrameInput::default()
        };

        tick(&mut session, &toggle, &mut scorer, &mut camera);
        assert_eq!(scorer.username_opacity, 0.0);

        tick(&mut session, &toggle, &mut scorer, &mut camera);
        assert_eq!(scorer.username_opacity, 0.8);
        assert_eq!(scorer.number_opacity, 1.0);
        assert!(scorer.body_visible());
    }

    #[test]
    fn test_stale_goal_only_matters_when_tracking_it() {
        let mut session = CameraSession::new(CameraConfig::default(), 0.1);
        let mut scorer = FakeScorer::standing_at(Vec3::ZERO);
        let mut camera = FakeCamera::default();
        let gone: Option<Pose> = None;

        let outcome = session.advance(
            0.016,
            &FrameInput::default(),
            ReplayRig {
                scorer: Some(&mut scorer),
                goal: Some(&gone),
                camera: Some(&mut camera),
            },
        );
        assert_eq!(outcome.error(), Some(&CameraError::StaleReference("goal")));

        let outcome = session.advance(
            0.016,
            &FrameInput {
                free_look_pressed: true,
                ..FrameInput::default()
            },
            ReplayRig {
                scorer: Some(&mut scorer),
                goal: Some(&gone),
                camera: Some(&mut camera),
            },
        );
        assert!(outcome.pose().is_some());
    }
}
