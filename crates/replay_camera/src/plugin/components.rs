use crate::rig::TrackingTarget;
use bevy::prelude::*;

/// Marker for the player copies that exist only inside a replay.
#[derive(Component, Debug, Default)]
pub struct ReplayPlayer;

/// Identifies a player across the live game and its replay copy.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerIdentity {
    pub username: String,
    pub number: u32,
}

/// Entities carrying the eye and head transforms of a replay player.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerRig {
    pub eye: Entity,
    pub head: Entity,
}

/// Body part visibility and name tag opacity, read by the host's renderer.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ScorerPresentation {
    pub groin_visible: bool,
    pub torso_visible: bool,
    pub head_visible: bool,
    pub username_opacity: f32,
    pub number_opacity: f32,
}

impl Default for ScorerPresentation {
    fn default() -> Self {
        Self {
            groin_visible: true,
            torso_visible: true,
            head_visible: true,
            username_opacity: 1.0,
            number_opacity: 1.0,
        }
    }
}

impl ScorerPresentation {
    pub fn body_visible(&self) -> bool {
        self.groin_visible && self.torso_visible && self.head_visible
    }
}

/// The camera a replay is rendered through. Its `Transform` is written
/// directly, so it should not be parented.
#[derive(Component, Debug, Clone, PartialEq)]
#[require(Transform)]
pub struct ReplayCamera {
    /// Degrees.
    pub field_of_view: f32,
    pub supports_tracking: bool,
    pub tracking: Option<TrackingTarget>,
}

impl Default for ReplayCamera {
    fn default() -> Self {
        Self {
            field_of_view: 90.0,
            supports_tracking: true,
            tracking: None,
        }
    }
}

#[derive(Component, Debug, Default)]
#[require(Transform)]
pub struct Goal;
