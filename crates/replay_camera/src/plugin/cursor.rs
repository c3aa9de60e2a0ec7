//! Pointer lock for free-look, mirrored onto the primary window.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

/// Whether the running replay holds the pointer.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorState {
    #[default]
    Free,
    Locked,
}

impl CursorState {
    pub fn from_locked(locked: bool) -> Self {
        if locked {
            Self::Locked
        } else {
            Self::Free
        }
    }

    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }
}

/// The host's cursor options from before the lock, put back on release.
#[derive(Resource, Debug, Default)]
pub(crate) struct HostCursor(Option<(CursorGrabMode, bool)>);

pub(crate) fn apply_cursor_state(
    state: Res<CursorState>,
    mut host: ResMut<HostCursor>,
    mut windows: Query<(&mut Window, &mut CursorOptions), With<PrimaryWindow>>,
) {
    if !state.is_changed() {
        return;
    }
    let Ok((mut window, mut cursor)) = windows.single_mut() else {
        return;
    };

    match *state {
        CursorState::Locked => {
            if host.0.is_none() {
                host.0 = Some((cursor.grab_mode, cursor.visible));
            }
            cursor.grab_mode = CursorGrabMode::Locked;
            cursor.visible = false;
            window.focused = true;
        }
        CursorState::Free => {
            // Never locked: the host's cursor is left alone.
            if let Some((grab_mode, visible)) = host.0.take() {
                cursor.grab_mode = grab_mode;
                cursor.visible = visible;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_app(grab_mode: CursorGrabMode) -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<CursorState>()
            .init_resource::<HostCursor>()
            .add_systems(Update, apply_cursor_state);
        let window = app
            .world_mut()
            .spawn((
                Window::default(),
                CursorOptions {
                    grab_mode,
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        (app, window)
    }

    fn options(app: &App, window: Entity) -> (CursorGrabMode, bool) {
        let cursor = app.world().get::<CursorOptions>(window).unwrap();
        (cursor.grab_mode, cursor.visible)
    }

    #[test]
    fn test_initial_free_state_keeps_host_cursor() {
        let (mut app, window) = cursor_app(CursorGrabMode::Confined);
        app.update();
        assert_eq!(options(&app, window), (CursorGrabMode::Confined, true));
    }

    #[test]
    fn test_lock_then_release_restores_host_cursor() {
        let (mut app, window) = cursor_app(CursorGrabMode::Confined);
        app.update();

        *app.world_mut().resource_mut::<CursorState>() = CursorState::Locked;
        app.update();
        assert_eq!(options(&app, window), (CursorGrabMode::Locked, false));
        assert!(app.world().get::<Window>(window).unwrap().focused);

        *app.world_mut().resource_mut::<CursorState>() = CursorState::Free;
        app.update();
        assert_eq!(options(&app, window), (CursorGrabMode::Confined, true));
    }

    #[test]
    fn test_from_locked() {
        assert!(CursorState::from_locked(true).is_locked());
        assert_eq!(CursorState::from_locked(false), CursorState::Free);
    }
}
