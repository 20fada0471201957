use super::models::AppConfig;
use super::tables::ConfigTables;
use crate::clock::clamp_wpm;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const MAX_SKIP_WORDS: usize = 500;

/// Load configuration from `path`, falling back to defaults on any problem.
pub fn load_config(path: &Path) -> AppConfig {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            debug!(path = %path.display(), "No config file, using defaults: {err}");
            return AppConfig::default();
        }
    };
    match parse_config(&data) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), "Invalid config, using defaults: {err:#}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(data: &str) -> Result<AppConfig> {
    let tables: ConfigTables = toml::from_str(data).context("Failed to parse config TOML")?;
    let mut config = AppConfig::from(tables);
    clamp_config(&mut config);
    Ok(config)
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("Failed to serialize config")
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    let contents = serialize_config(config)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write config at {}", path.display()))
}

/// Keep loaded values inside the ranges the reader supports.
pub fn clamp_config(config: &mut AppConfig) {
    fn normalize_key_binding(value: &mut String, fallback: &str) {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            *value = fallback.to_string();
        } else {
            *value = normalized;
        }
    }

    config.wpm = clamp_wpm(config.wpm);
    config.skip_words = config.skip_words.clamp(1, MAX_SKIP_WORDS);
    config.max_column_width = config.max_column_width.filter(|width| *width > 0);
    config.window_width = if config.window_width.is_finite() {
        config.window_width.clamp(320.0, 7680.0)
    } else {
        super::defaults::default_window_width()
    };
    config.window_height = if config.window_height.is_finite() {
        config.window_height.clamp(240.0, 4320.0)
    } else {
        super::defaults::default_window_height()
    };
    if config.cache_dir.trim().is_empty() {
        config.cache_dir = super::defaults::default_cache_dir();
    }
    normalize_key_binding(&mut config.key_toggle_play_pause, "space");
    normalize_key_binding(&mut config.key_step_backward, "left");
    normalize_key_binding(&mut config.key_step_forward, "right");
    normalize_key_binding(&mut config.key_skip_backward, "shift+left");
    normalize_key_binding(&mut config.key_skip_forward, "shift+right");
    normalize_key_binding(&mut config.key_faster, "up");
    normalize_key_binding(&mut config.key_slower, "down");
    normalize_key_binding(&mut config.key_toggle_fullscreen, "f");
    normalize_key_binding(&mut config.key_close_session, "escape");
    normalize_key_binding(&mut config.key_cycle_theme, "t");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use crate::theme::ThemeMode;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_grouped_tables() {
        let config = parse_config(
            r#"
            [reading]
            wpm = 450
            skip_words = 25

            [appearance]
            theme = "sepia"
            max_column_width = 720

            [logging]
            log_level = "warn"

            [keys]
            toggle_play_pause = " K "
            "#,
        )
        .expect("config parses");

        assert_eq!(config.wpm, 450);
        assert_eq!(config.skip_words, 25);
        assert_eq!(config.theme, ThemeMode::Sepia);
        assert_eq!(config.max_column_width, Some(720));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.key_toggle_play_pause, "k");
        assert_eq!(config.key_step_forward, "right");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            r#"
            [reading]
            wpm = 5000
            skip_words = 0

            [appearance]
            max_column_width = 0
            window_width = 10.0

            [keys]
            step_backward = "   "
            "#,
        )
        .expect("config parses");

        assert_eq!(config.wpm, 1000);
        assert_eq!(config.skip_words, 1);
        assert_eq!(config.max_column_width, None);
        assert_eq!(config.window_width, 320.0);
        assert_eq!(config.key_step_backward, "left");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(parse_config("[reading\nwpm = ").is_err());
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut config = AppConfig::default();
        config.wpm = 520;
        config.theme = ThemeMode::Light;
        config.max_column_width = Some(900);

        let text = serialize_config(&config).expect("serializes");
        let parsed = parse_config(&text).expect("parses");

        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/definitely/not/here/config.toml"));
        assert_eq!(config, AppConfig::default());
    }
}
