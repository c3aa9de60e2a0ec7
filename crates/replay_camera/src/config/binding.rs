use crate::error::UnknownBinding;
use bevy::input::{keyboard::KeyCode, mouse::MouseButton};
use std::fmt;
use std::str::FromStr;

/// A key or mouse button a camera action is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    Key(KeyCode),
    Mouse(MouseButton),
}

/// Resolved bindings for the two camera actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub toggle_camera: InputBinding,
    pub free_look: InputBinding,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            toggle_camera: InputBinding::Key(KeyCode::KeyC),
            free_look: InputBinding::Mouse(MouseButton::Right),
        }
    }
}

const MOUSE_BUTTONS: &[(&str, MouseButton)] = &[
    ("leftButton", MouseButton::Left),
    ("rightButton", MouseButton::Right),
    ("middleButton", MouseButton::Middle),
    ("forwardButton", MouseButton::Forward),
    ("backButton", MouseButton::Back),
];

const KEYS: &[(&str, KeyCode)] = &[
    ("a", KeyCode::KeyA),
    ("b", KeyCode::KeyB),
    ("c", KeyCode::KeyC),
    ("d", KeyCode::KeyD),
    ("e", KeyCode::KeyE),
    ("f", KeyCode::KeyF),
    ("g", KeyCode::KeyG),
    ("h", KeyCode::KeyH),
    ("i", KeyCode::KeyI),
    ("j", KeyCode::KeyJ),
    ("k", KeyCode::KeyK),
    ("l", KeyCode::KeyL),
    ("m", KeyCode::KeyM),
    ("n", KeyCode::KeyN),
    ("o", KeyCode::KeyO),
    ("p", KeyCode::KeyP),
    ("q", KeyCode::KeyQ),
    ("r", KeyCode::KeyR),
    ("s", KeyCode::KeyS),
    ("t", KeyCode::KeyT),
    ("u", KeyCode::KeyU),
    ("v", KeyCode::KeyV),
    ("w", KeyCode::KeyW),
    ("x", KeyCode::KeyX),
    ("y", KeyCode::KeyY),
    ("z", KeyCode::KeyZ),
    ("digit0", KeyCode::Digit0),
    ("digit1", KeyCode::Digit1),
    ("digit2", KeyCode::Digit2),
    ("digit3", KeyCode::Digit3),
    ("digit4", KeyCode::Digit4),
    ("digit5", KeyCode::Digit5),
    ("digit6", KeyCode::Digit6),
    ("digit7", KeyCode::Digit7),
    ("digit8", KeyCode::Digit8),
    ("digit9", KeyCode::Digit9),
    ("f1", KeyCode::F1),
    ("f2", KeyCode::F2),
    ("f3", KeyCode::F3),
    ("f4", KeyCode::F4),
    ("f5", KeyCode::F5),
    ("f6", KeyCode::F6),
    ("f7", KeyCode::F7),
    ("f8", KeyCode::F8),
    ("f9", KeyCode::F9),
    ("f10", KeyCode::F10),
    ("f11", KeyCode::F11),
    ("f12", KeyCode::F12),
    ("space", KeyCode::Space),
    ("tab", KeyCode::Tab),
    ("enter", KeyCode::Enter),
    ("escape", KeyCode::Escape),
    ("backspace", KeyCode::Backspace),
    ("delete", KeyCode::Delete),
    ("insert", KeyCode::Insert),
    ("home", KeyCode::Home),
    ("end", KeyCode::End),
    ("pageUp", KeyCode::PageUp),
    ("pageDown", KeyCode::PageDown),
    ("upArrow", KeyCode::ArrowUp),
    ("downArrow", KeyCode::ArrowDown),
    ("leftArrow", KeyCode::ArrowLeft),
    ("rightArrow", KeyCode::ArrowRight),
    ("leftShift", KeyCode::ShiftLeft),
    ("rightShift", KeyCode::ShiftRight),
    ("leftCtrl", KeyCode::ControlLeft),
    ("rightCtrl", KeyCode::ControlRight),
    ("leftAlt", KeyCode::AltLeft),
    ("rightAlt", KeyCode::AltRight),
    ("leftMeta", KeyCode::SuperLeft),
    ("rightMeta", KeyCode::SuperRight),
    ("capsLock", KeyCode::CapsLock),
    ("numLock", KeyCode::NumLock),
    ("scrollLock", KeyCode::ScrollLock),
    ("printScreen", KeyCode::PrintScreen),
    ("pause", KeyCode::Pause),
    ("numpad0", KeyCode::Numpad0),
    ("numpad1", KeyCode::Numpad1),
    ("numpad2", KeyCode::Numpad2),
    ("numpad3", KeyCode::Numpad3),
    ("numpad4", KeyCode::Numpad4),
    ("numpad5", KeyCode::Numpad5),
    ("numpad6", KeyCode::Numpad6),
    ("numpad7", KeyCode::Numpad7),
    ("numpad8", KeyCode::Numpad8),
    ("numpad9", KeyCode::Numpad9),
    ("numpadDivide", KeyCode::NumpadDivide),
    ("numpadMultiply", KeyCode::NumpadMultiply),
    ("numpadMinus", KeyCode::NumpadSubtract),
    ("numpadPlus", KeyCode::NumpadAdd),
    ("numpadEnter", KeyCode::NumpadEnter),
    ("numpadPeriod", KeyCode::NumpadDecimal),
    ("semicolon", KeyCode::Semicolon),
    ("comma", KeyCode::Comma),
    ("period", KeyCode::Period),
    ("slash", KeyCode::Slash),
    ("backslash", KeyCode::Backslash),
    ("leftBracket", KeyCode::BracketLeft),
    ("rightBracket", KeyCode::BracketRight),
    ("quote", KeyCode::Quote),
    ("backquote", KeyCode::Backquote),
    ("minus", KeyCode::Minus),
    ("equals", KeyCode::Equal),
];

impl InputBinding {
    /// Canonical config name of this binding, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            InputBinding::Key(code) => KEYS
                .iter()
                .find(|(_, key)| key == code)
                .map(|(name, _)| *name),
            InputBinding::Mouse(button) => MOUSE_BUTTONS
                .iter()
                .find(|(_, b)| b == button)
                .map(|(name, _)| *name),
        }
    }

    pub fn is_valid_name(name: &str) -> bool {
        name.parse::<InputBinding>().is_ok()
    }
}

impl FromStr for InputBinding {
    type Err = UnknownBinding;

    /// Names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some((_, button)) = MOUSE_BUTTONS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        {
            return Ok(InputBinding::Mouse(*button));
        }
        KEYS.iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, code)| InputBinding::Key(*code))
            .ok_or_else(|| UnknownBinding(s.to_string()))
    }
}

impl fmt::Display for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_case_insensitive() {
        assert_eq!("c".parse(), Ok(InputBinding::Key(KeyCode::KeyC)));
        assert_eq!("C".parse(), Ok(InputBinding::Key(KeyCode::KeyC)));
        assert_eq!("PageUp".parse(), Ok(InputBinding::Key(KeyCode::PageUp)));
        assert_eq!("leftctrl".parse(), Ok(InputBinding::Key(KeyCode::ControlLeft)));
        assert_eq!(
            "NUMPADMINUS".parse(),
            Ok(InputBinding::Key(KeyCode::NumpadSubtract))
        );
    }

    #[test]
    fn test_parse_mouse_buttons() {
        assert_eq!(
            "rightButton".parse(),
            Ok(InputBinding::Mouse(MouseButton::Right))
        );
        assert_eq!(
            "BACKBUTTON".parse(),
            Ok(InputBinding::Mouse(MouseButton::Back))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "hyper".parse::<InputBinding>(),
            Err(UnknownBinding("hyper".into()))
        );
        assert!(!InputBinding::is_valid_name(""));
    }

    #[test]
    fn test_display_uses_config_name() {
        assert_eq!(InputBinding::Key(KeyCode::Equal).to_string(), "equals");
        assert_eq!(
            InputBinding::Mouse(MouseButton::Middle).to_string(),
            "middleButton"
        );
    }

    #[test]
    fn test_every_name_round_trips() {
        for (name, code) in KEYS {
            assert_eq!(InputBinding::Key(*code).name(), Some(*name));
        }
        for (name, button) in MOUSE_BUTTONS {
            assert_eq!(name.parse(), Ok(InputBinding::Mouse(*button)));
        }
    }
}
