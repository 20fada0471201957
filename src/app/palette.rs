//! Bridges core style tokens to iced colours and themes.

use iced::Color;
use iced::theme::{Palette, Theme};
use rsvp_core::theme::{Rgba, StyleTokens, ThemeMode};

pub(super) fn color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}

pub(super) fn iced_theme(mode: ThemeMode) -> Theme {
    let tokens: StyleTokens = mode.tokens();
    Theme::custom(
        format!("Reader {mode}"),
        Palette {
            background: color(tokens.background),
            text: color(tokens.foreground),
            primary: color(tokens.progress_fill),
            success: color(tokens.muted),
            danger: color(tokens.fixation),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_uses_token_background() {
        for mode in ThemeMode::ALL {
            let theme = iced_theme(mode);
            assert_eq!(theme.palette().background, color(mode.tokens().background));
        }
    }

    #[test]
    fn colour_channels_pass_through() {
        let rgba = Rgba {
            r: 0.25,
            g: 0.5,
            b: 0.75,
            a: 1.0,
        };
        let converted = color(rgba);
        assert_eq!((converted.r, converted.g, converted.b), (0.25, 0.5, 0.75));
    }
}
