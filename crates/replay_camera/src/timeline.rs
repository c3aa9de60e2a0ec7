//! Deferred one-shot events of a replay, run against the replay's own clock.

use bevy::time::{Timer, TimerMode};
use std::time::Duration;

/// Delay before the goal scorer is looked up among the replay players.
pub const SCORER_ATTACH_DELAY: Duration = Duration::from_millis(100);
/// Delay before the camera switches from the goal to the scorer.
pub const GOAL_SCORED_DELAY: Duration = Duration::from_secs(7);
/// How long a replay session lives.
pub const REPLAY_LIFETIME: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    AttachScorer,
    GoalScored,
    Expired,
}

#[derive(Debug, Clone)]
pub struct ReplayTimeline {
    attach_scorer: Timer,
    goal_scored: Timer,
    lifetime: Timer,
}

impl Default for ReplayTimeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayTimeline {
    pub fn new() -> Self {
        Self {
            attach_scorer: Timer::new(SCORER_ATTACH_DELAY, TimerMode::Once),
            goal_scored: Timer::new(GOAL_SCORED_DELAY, TimerMode::Once),
            lifetime: Timer::new(REPLAY_LIFETIME, TimerMode::Once),
        }
    }

    /// Advance the clock and return the events that became due, in order.
    /// Each event fires exactly once.
    pub fn tick(&mut self, delta: Duration) -> Vec<TimelineEvent> {
        let mut due = Vec::new();
        if self.attach_scorer.tick(delta).just_finished() {
            due.push(TimelineEvent::AttachScorer);
        }
        if self.goal_scored.tick(delta).just_finished() {
            due.push(TimelineEvent::GoalScored);
        }
        if self.lifetime.tick(delta).just_finished() {
            due.push(TimelineEvent::Expired);
        }
        due
    }

    /// Time since the replay started.
    pub fn elapsed(&self) -> Duration {
        self.lifetime.elapsed()
    }
}
