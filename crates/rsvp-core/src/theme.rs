//! Theme modes and the style tokens every view reads from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }
}

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleTokens {
    pub background: Rgba,
    pub foreground: Rgba,
    /// Colour of the fixation character.
    pub fixation: Rgba,
    pub muted: Rgba,
    pub progress_track: Rgba,
    pub progress_fill: Rgba,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
    Sepia,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Sepia];

    pub fn tokens(self) -> StyleTokens {
        match self {
            ThemeMode::Light => StyleTokens {
                background: Rgba::rgb(0xfa, 0xfa, 0xf7),
                foreground: Rgba::rgb(0x1c, 0x1c, 0x1e),
                fixation: Rgba::rgb(0xd6, 0x28, 0x28),
                muted: Rgba::rgb(0x6e, 0x6e, 0x73),
                progress_track: Rgba::rgb(0xe0, 0xe0, 0xe0),
                progress_fill: Rgba::rgb(0x1c, 0x1c, 0x1e),
            },
            ThemeMode::Dark => StyleTokens {
                background: Rgba::rgb(0x12, 0x12, 0x14),
                foreground: Rgba::rgb(0xe8, 0xe8, 0xe8),
                fixation: Rgba::rgb(0xff, 0x5a, 0x4f),
                muted: Rgba::rgb(0x8e, 0x8e, 0x93),
                progress_track: Rgba::rgb(0x2c, 0x2c, 0x2e),
                progress_fill: Rgba::rgb(0xe8, 0xe8, 0xe8),
            },
            ThemeMode::Sepia => StyleTokens {
                background: Rgba::rgb(0xf4, 0xec, 0xd8),
                foreground: Rgba::rgb(0x43, 0x34, 0x22),
                fixation: Rgba::rgb(0xb3, 0x3a, 0x1a),
                muted: Rgba::rgb(0x8a, 0x76, 0x5c),
                progress_track: Rgba::rgb(0xe3, 0xd6, 0xba),
                progress_fill: Rgba::rgb(0x43, 0x34, 0x22),
            },
        }
    }

    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Sepia,
            ThemeMode::Sepia => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::Sepia => "Sepia",
        };
        write!(f, "{}", label)
    }
}
