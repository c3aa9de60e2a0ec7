use crate::config::{Bindings, InputBinding};
use bevy::math::Vec2;

/// Edge-detected buttons plus continuous pointer deltas for one tick.
pub trait InputSource {
    fn just_pressed(&self, binding: InputBinding) -> bool;
    fn just_released(&self, binding: InputBinding) -> bool;
    /// Pointer movement since the last tick. Positive y is downwards.
    fn mouse_delta(&self) -> Vec2;
    /// Vertical scroll since the last tick. Positive scrolls away from the user.
    fn scroll_delta(&self) -> f32;
}

/// Input snapshot consumed by one controller tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub toggle_pressed: bool,
    pub free_look_pressed: bool,
    pub free_look_released: bool,
    pub mouse_delta: Vec2,
    pub scroll: f32,
}

impl FrameInput {
    pub fn capture(source: &dyn InputSource, bindings: &Bindings) -> Self {
        Self {
            toggle_pressed: source.just_pressed(bindings.toggle_camera),
            free_look_pressed: source.just_pressed(bindings.free_look),
            free_look_released: source.just_released(bindings.free_look),
            mouse_delta: source.mouse_delta(),
            scroll: source.scroll_delta(),
        }
    }
}
