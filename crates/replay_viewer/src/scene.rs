//! A scripted goal: one player runs at the goal while a teammate trails
//! behind, the replay starts immediately and the camera toggles between
//! person modes on a fixed schedule.

use bevy::prelude::*;
use replay_camera::plugin::{
    ActiveReplay, Goal, GoalTriggered, PlayerIdentity, PlayerRig, ReplayCamera,
    ReplayCameraSettings, ReplayFinished, ReplayPlayer, ReplayStarted, ScorerAnnounced,
    ScorerPresentation,
};
use replay_camera::InputBinding;
use tracing::info;

const GOAL_POSITION: Vec3 = Vec3::new(0.0, 1.2, -40.0);
const EYE_HEIGHT: f32 = 1.7;
const HEAD_HEIGHT: f32 = 1.6;
/// Seconds the scorer keeps running before stopping at the goal.
const RUN_DURATION: f32 = 6.5;
/// Seconds into the replay at which the toggle binding is pressed.
const TOGGLE_SCHEDULE: &[f32] = &[3.0, 5.0];

pub struct ScriptedReplayPlugin;

impl Plugin for ScriptedReplayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .insert_resource(CameraLog(Timer::from_seconds(1.0, TimerMode::Repeating)))
            .add_systems(Startup, spawn_scene)
            .add_systems(PreUpdate, script_input)
            .add_systems(Update, (animate_players, log_camera, exit_when_finished));
    }
}

/// Straight-line run used to animate a player's eye and head.
#[derive(Component, Debug, Clone, Copy)]
struct RunUp {
    start: Vec3,
    velocity: Vec3,
}

#[derive(Resource)]
struct CameraLog(Timer);

fn spawn_player(commands: &mut Commands, identity: PlayerIdentity, run: RunUp) {
    let eye = commands
        .spawn(GlobalTransform::from_translation(
            run.start + Vec3::Y * EYE_HEIGHT,
        ))
        .id();
    let head = commands
        .spawn(GlobalTransform::from_translation(
            run.start + Vec3::Y * HEAD_HEIGHT,
        ))
        .id();
    commands.spawn((
        ReplayPlayer,
        identity,
        PlayerRig { eye, head },
        ScorerPresentation::default(),
        run,
    ));
}

fn spawn_scene(
    mut commands: Commands,
    mut goals: MessageWriter<GoalTriggered>,
    mut scorers: MessageWriter<ScorerAnnounced>,
    mut replays: MessageWriter<ReplayStarted>,
) {
    let goal = commands
        .spawn((
            Goal,
            Transform::from_translation(GOAL_POSITION),
            GlobalTransform::from_translation(GOAL_POSITION),
        ))
        .id();
    let camera = commands.spawn(ReplayCamera::default()).id();

    let scorer = PlayerIdentity {
        username: "striker".into(),
        number: 9,
    };
    spawn_player(
        &mut commands,
        scorer.clone(),
        RunUp {
            start: Vec3::new(8.0, 0.0, 0.0),
            velocity: Vec3::new(-1.2, 0.0, -5.5),
        },
    );
    spawn_player(
        &mut commands,
        PlayerIdentity {
            username: "winger".into(),
            number: 11,
        },
        RunUp {
            start: Vec3::new(-6.0, 0.0, 4.0),
            velocity: Vec3::new(0.8, 0.0, -4.0),
        },
    );

    goals.write(GoalTriggered { goal });
    scorers.write(ScorerAnnounced { identity: scorer });
    replays.write(ReplayStarted { camera });
    info!("scripted replay scene spawned");
}

/// Press the configured toggle binding on schedule.
fn script_input(
    time: Res<Time>,
    settings: Res<ReplayCameraSettings>,
    mut keys: ResMut<ButtonInput<KeyCode>>,
    mut buttons: ResMut<ButtonInput<MouseButton>>,
    mut next: Local<usize>,
) {
    keys.release_all();
    keys.clear();
    buttons.release_all();
    buttons.clear();

    let Some(at) = TOGGLE_SCHEDULE.get(*next) else {
        return;
    };
    if time.elapsed_secs() < *at {
        return;
    }
    *next += 1;

    let binding = settings.current().bindings().toggle_camera;
    match binding {
        InputBinding::Key(key) => keys.press(key),
        InputBinding::Mouse(button) => buttons.press(button),
    }
    info!(%binding, "scripted camera toggle");
}

fn animate_players(
    time: Res<Time>,
    players: Query<(&PlayerRig, &RunUp)>,
    mut transforms: Query<&mut GlobalTransform>,
) {
    let t = time.elapsed_secs().min(RUN_DURATION);
    for (rig, run) in &players {
        let feet = run.start + run.velocity * t;
        for (entity, height) in [(rig.eye, EYE_HEIGHT), (rig.head, HEAD_HEIGHT)] {
            let Ok(mut global) = transforms.get_mut(entity) else {
                continue;
            };
            let position = feet + Vec3::Y * height;
            *global = Transform::from_translation(position)
                .looking_at(GOAL_POSITION, Vec3::Y)
                .into();
        }
    }
}

fn log_camera(
    time: Res<Time>,
    mut log: ResMut<CameraLog>,
    active: Res<ActiveReplay>,
    cameras: Query<(&Transform, &ReplayCamera)>,
) {
    if !log.0.tick(time.delta()).just_finished() {
        return;
    }
    let Some(replay) = active.get() else {
        return;
    };
    let Ok((transform, camera)) = cameras.get(replay.camera) else {
        return;
    };
    info!(
        elapsed = ?replay.timeline.elapsed(),
        mode = ?replay.session.person_mode(),
        position = ?transform.translation,
        tracking = ?camera.tracking,
        "replay camera"
    );
}

fn exit_when_finished(
    mut finished: MessageReader<ReplayFinished>,
    mut exit: MessageWriter<AppExit>,
) {
    if finished.read().next().is_some() {
        info!("replay finished, shutting down");
        exit.write(AppExit::Success);
    }
}
