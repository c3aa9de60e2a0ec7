use super::components::PlayerIdentity;
use bevy::prelude::*;

/// A goal was scored into `goal`. Recorded for the next replay.
#[derive(Message, Debug, Clone)]
pub struct GoalTriggered {
    pub goal: Entity,
}

/// The player who scored. Resolved against the replay players shortly
/// after the replay starts.
#[derive(Message, Debug, Clone)]
pub struct ScorerAnnounced {
    pub identity: PlayerIdentity,
}

/// A replay began, rendered through `camera`. Replaces any running replay.
#[derive(Message, Debug, Clone)]
pub struct ReplayStarted {
    pub camera: Entity,
}

/// The replay session ended and was torn down.
#[derive(Message, Debug, Default, Clone)]
pub struct ReplayFinished;
