use super::super::messages::Message;
use super::super::state::{App, Screen};
use iced::keyboard::{Key, Modifiers, key};
use rsvp_core::session::SessionCommand;

impl App {
    pub(super) fn shortcut_message_for_key(
        &self,
        key: Key,
        modifiers: Modifiers,
    ) -> Option<Message> {
        let pressed = pressed_token(&key)?;
        let config = &self.config;

        if Self::shortcut_matches(&config.key_cycle_theme, "t", &pressed, modifiers) {
            return Some(Message::CycleTheme);
        }
        if Self::shortcut_matches(&config.key_toggle_fullscreen, "f", &pressed, modifiers) {
            return Some(Message::ToggleFullscreen);
        }
        if self.screen != Screen::Reading {
            return None;
        }

        let bindings: [(&str, &str, Message); 8] = [
            (
                config.key_toggle_play_pause.as_str(),
                "space",
                Message::Reader(SessionCommand::PlayPause),
            ),
            (
                config.key_step_backward.as_str(),
                "left",
                Message::Reader(SessionCommand::StepBackward),
            ),
            (
                config.key_step_forward.as_str(),
                "right",
                Message::Reader(SessionCommand::StepForward),
            ),
            (
                config.key_skip_backward.as_str(),
                "shift+left",
                Message::Reader(SessionCommand::SkipBackward),
            ),
            (
                config.key_skip_forward.as_str(),
                "shift+right",
                Message::Reader(SessionCommand::SkipForward),
            ),
            (
                config.key_faster.as_str(),
                "up",
                Message::Reader(SessionCommand::Faster),
            ),
            (
                config.key_slower.as_str(),
                "down",
                Message::Reader(SessionCommand::Slower),
            ),
            (config.key_close_session.as_str(), "escape", Message::CloseSession),
        ];

        bindings
            .into_iter()
            .find(|(raw, fallback, _)| Self::shortcut_matches(raw, fallback, &pressed, modifiers))
            .map(|(_, _, message)| message)
    }

    pub(super) fn shortcut_matches(
        raw: &str,
        fallback: &str,
        pressed: &str,
        modifiers: Modifiers,
    ) -> bool {
        let normalized = Self::normalize_shortcut_token(raw, fallback);

        let mut required_ctrl = false;
        let mut required_alt = false;
        let mut required_logo = false;
        let mut required_shift = false;
        let mut required_key: Option<&str> = None;

        for token in normalized
            .split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match token {
                "ctrl" | "control" => required_ctrl = true,
                "alt" => required_alt = true,
                "logo" | "meta" | "super" | "cmd" | "command" => required_logo = true,
                "shift" => required_shift = true,
                key => required_key = Some(key),
            }
        }

        let Some(required_key) = required_key else {
            return false;
        };
        if pressed != required_key {
            return false;
        }

        modifiers.control() == required_ctrl
            && modifiers.alt() == required_alt
            && modifiers.logo() == required_logo
            && modifiers.shift() == required_shift
    }

    pub(super) fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return fallback.to_string();
        }
        normalized
            .replace("spacebar", "space")
            .replace("arrowleft", "left")
            .replace("arrowright", "right")
            .replace("arrowup", "up")
            .replace("arrowdown", "down")
            .split('+')
            .map(|token| if token.trim() == "esc" { "escape" } else { token })
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Name of the pressed key in the vocabulary used by config bindings.
fn pressed_token(key: &Key) -> Option<String> {
    let token = match key.as_ref() {
        Key::Named(key::Named::Space) => "space".to_string(),
        Key::Named(key::Named::ArrowLeft) => "left".to_string(),
        Key::Named(key::Named::ArrowRight) => "right".to_string(),
        Key::Named(key::Named::ArrowUp) => "up".to_string(),
        Key::Named(key::Named::ArrowDown) => "down".to_string(),
        Key::Named(key::Named::Escape) => "escape".to_string(),
        Key::Character(ch) => ch.to_ascii_lowercase(),
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::keyboard::Modifiers;

    #[test]
    fn normalizes_key_aliases() {
        assert_eq!(App::normalize_shortcut_token(" SpaceBar ", "x"), "space");
        assert_eq!(App::normalize_shortcut_token("Shift+ArrowLeft", "x"), "shift+left");
        assert_eq!(App::normalize_shortcut_token("esc", "x"), "escape");
        assert_eq!(App::normalize_shortcut_token("  ", "right"), "right");
    }

    #[test]
    fn plain_arrow_does_not_match_shifted_binding() {
        assert!(App::shortcut_matches("left", "x", "left", Modifiers::empty()));
        assert!(!App::shortcut_matches("left", "x", "left", Modifiers::SHIFT));
        assert!(App::shortcut_matches("shift+left", "x", "left", Modifiers::SHIFT));
        assert!(!App::shortcut_matches("shift+left", "x", "left", Modifiers::empty()));
    }

    #[test]
    fn rejects_unexpected_extra_modifier() {
        assert!(!App::shortcut_matches(
            "ctrl+f",
            "x",
            "f",
            Modifiers::CTRL | Modifiers::SHIFT,
        ));
    }

    #[test]
    fn empty_binding_falls_back_to_default() {
        assert!(App::shortcut_matches("", "space", "space", Modifiers::empty()));
    }

    #[test]
    fn named_keys_map_to_binding_vocabulary() {
        assert_eq!(
            pressed_token(&Key::Named(key::Named::ArrowRight)).as_deref(),
            Some("right")
        );
        assert_eq!(
            pressed_token(&Key::Character("T".into())).as_deref(),
            Some("t")
        );
        assert_eq!(pressed_token(&Key::Named(key::Named::Tab)), None);
    }
}
