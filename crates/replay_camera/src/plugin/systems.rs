use super::adapters::{CameraHandle, DeviceInput, ScorerHandle};
use super::components::{
    PlayerIdentity, PlayerRig, ReplayCamera, ReplayPlayer, ScorerPresentation,
};
use super::cursor::CursorState;
use super::messages::{GoalTriggered, ReplayFinished, ReplayStarted, ScorerAnnounced};
use super::resources::{
    ActiveReplay, HostCameraSettings, ReplayCameraSettings, ReplayContext, ReplaySession,
};
use crate::input::FrameInput;
use crate::rig::{CameraSink, Pose, PoseSource, ReplayRig, ScorerRig};
use crate::session::CameraSession;
use crate::timeline::{ReplayTimeline, TimelineEvent};
use bevy::prelude::*;
use tracing::{debug, error, info, trace, warn};

/// Record goal and scorer announcements. A goal also reaches the running
/// replay, since it may be triggered after the replay started.
pub(crate) fn track_announcements(
    mut goals: MessageReader<GoalTriggered>,
    mut scorers: MessageReader<ScorerAnnounced>,
    mut context: ResMut<ReplayContext>,
    mut active: ResMut<ActiveReplay>,
) {
    for GoalTriggered { goal } in goals.read() {
        debug!(?goal, "goal triggered");
        context.scored_goal = Some(*goal);
        if let Some(replay) = active.0.as_mut() {
            replay.goal = Some(*goal);
        }
    }
    for ScorerAnnounced { identity } in scorers.read() {
        info!(
            username = %identity.username,
            number = identity.number,
            "goal scorer announced"
        );
        context.scorer_identity = Some(identity.clone());
    }
}

/// Create a fresh session for the newest [`ReplayStarted`].
pub(crate) fn start_replay(
    mut started: MessageReader<ReplayStarted>,
    mut settings: ResMut<ReplayCameraSettings>,
    host: Res<HostCameraSettings>,
    context: Res<ReplayContext>,
    mut active: ResMut<ActiveReplay>,
    mut cameras: Query<(&mut Transform, &mut ReplayCamera)>,
) {
    let Some(ReplayStarted { camera }) = started.read().last().cloned() else {
        return;
    };

    settings.reload_if_changed();
    let mut session = CameraSession::resume(
        settings.current().clone(),
        host.look_sensitivity,
        context.memory,
    );

    let mut handle = CameraHandle::new(cameras.get_mut(camera).ok());
    if handle.pose().is_none() {
        warn!(?camera, "replay camera entity has no ReplayCamera");
    }
    session.attach_camera(&mut handle, None, host.field_of_view);

    if context.scored_goal.is_none() {
        warn!("replay started before any goal was triggered");
    }
    if active.is_running() {
        info!("replacing running replay");
    }

    active.0 = Some(ReplaySession {
        session,
        timeline: ReplayTimeline::new(),
        camera,
        goal: context.scored_goal,
        scorer: None,
    });
    info!(?camera, "replay started");
}

/// Run the replay's deferred events.
#[allow(clippy::too_many_arguments)]
pub(crate) fn advance_timeline(
    time: Res<Time>,
    mut active: ResMut<ActiveReplay>,
    mut context: ResMut<ReplayContext>,
    mut cursor: ResMut<CursorState>,
    mut finished: MessageWriter<ReplayFinished>,
    players: Query<(Entity, &PlayerIdentity, &PlayerRig), With<ReplayPlayer>>,
    poses: Query<&GlobalTransform>,
    mut presentations: Query<&mut ScorerPresentation>,
    mut cameras: Query<(&mut Transform, &mut ReplayCamera)>,
) {
    let Some(replay) = active.0.as_mut() else {
        return;
    };

    for event in replay.timeline.tick(time.delta()) {
        match event {
            TimelineEvent::AttachScorer => {
                let Some(identity) = context.scorer_identity.as_ref() else {
                    error!("no goal scorer was announced for this replay");
                    continue;
                };
                let Some((entity, _, rig)) = players.iter().find(|(_, id, _)| *id == identity)
                else {
                    error!(
                        username = %identity.username,
                        number = identity.number,
                        "goal scorer not found among replay players"
                    );
                    continue;
                };

                let scorer =
                    ScorerHandle::new(Some(*rig), &poses, presentations.get_mut(entity).ok());
                let mut camera = cameras
                    .get_mut(replay.camera)
                    .ok()
                    .map(|parts| CameraHandle::new(Some(parts)));
                replay.session.attach_scorer(
                    &scorer,
                    camera.as_mut().map(|camera| camera as &mut dyn CameraSink),
                );
                replay.scorer = Some(entity);
                info!(?entity, username = %identity.username, "goal scorer attached");
            }
            TimelineEvent::GoalScored => replay.session.set_goal_scored(true),
            TimelineEvent::Expired => {
                if let Some(memory) = replay.session.remembered_state() {
                    context.memory = Some(memory);
                }
                active.0 = None;
                cursor.set_if_neq(CursorState::Free);
                finished.write(ReplayFinished);
                info!("replay finished");
                return;
            }
        }
    }
}

pub(crate) fn reload_config(
    mut settings: ResMut<ReplayCameraSettings>,
    mut active: ResMut<ActiveReplay>,
) {
    let Some(config) = settings.reload_if_changed() else {
        return;
    };
    if let Some(replay) = active.0.as_mut() {
        replay.session.set_config(config.clone());
    }
}

/// One controller tick for the running replay.
#[allow(clippy::too_many_arguments)]
pub(crate) fn drive_camera(
    time: Res<Time>,
    input: DeviceInput,
    host: Res<HostCameraSettings>,
    mut active: ResMut<ActiveReplay>,
    mut context: ResMut<ReplayContext>,
    mut cursor: ResMut<CursorState>,
    rigs: Query<&PlayerRig>,
    poses: Query<&GlobalTransform>,
    mut presentations: Query<&mut ScorerPresentation>,
    mut cameras: Query<(&mut Transform, &mut ReplayCamera)>,
) {
    let Some(replay) = active.0.as_mut() else {
        return;
    };
    let session = &mut replay.session;
    if host.is_changed() {
        session.set_look_sensitivity(host.look_sensitivity);
    }

    let frame = FrameInput::capture(&input, &session.bindings());

    let mut scorer = match replay.scorer {
        Some(entity) => Some(ScorerHandle::new(
            rigs.get(entity).ok().copied(),
            &poses,
            presentations.get_mut(entity).ok(),
        )),
        None => None,
    };
    let goal: Option<Option<Pose>> = replay
        .goal
        .map(|entity| poses.get(entity).ok().map(Pose::from));
    let mut camera = CameraHandle::new(cameras.get_mut(replay.camera).ok());

    let outcome = session.advance(
        time.delta_secs(),
        &frame,
        ReplayRig {
            scorer: scorer.as_mut().map(|scorer| scorer as &mut dyn ScorerRig),
            goal: goal.as_ref().map(|goal| goal as &dyn PoseSource),
            camera: Some(&mut camera),
        },
    );
    trace!(?outcome, "camera tick");

    if let Some(memory) = session.remembered_state() {
        context.memory = Some(memory);
    }
    cursor.set_if_neq(CursorState::from_locked(session.cursor_locked()));
}
