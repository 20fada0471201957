use super::defaults;
use super::models::{AppConfig, LogLevel};
use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};

/// On-disk layout of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    reading: ReadingConfig,
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    storage: StorageConfig,
    #[serde(default)]
    keys: KeysConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            wpm: tables.reading.wpm,
            skip_words: tables.reading.skip_words,
            theme: tables.appearance.theme,
            max_column_width: tables.appearance.max_column_width,
            window_width: tables.appearance.window_width,
            window_height: tables.appearance.window_height,
            log_level: tables.logging.log_level,
            cache_dir: tables.storage.cache_dir,
            key_toggle_play_pause: tables.keys.toggle_play_pause,
            key_step_backward: tables.keys.step_backward,
            key_step_forward: tables.keys.step_forward,
            key_skip_backward: tables.keys.skip_backward,
            key_skip_forward: tables.keys.skip_forward,
            key_faster: tables.keys.faster,
            key_slower: tables.keys.slower,
            key_toggle_fullscreen: tables.keys.toggle_fullscreen,
            key_close_session: tables.keys.close_session,
            key_cycle_theme: tables.keys.cycle_theme,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            reading: ReadingConfig {
                wpm: config.wpm,
                skip_words: config.skip_words,
            },
            appearance: AppearanceConfig {
                theme: config.theme,
                max_column_width: config.max_column_width,
                window_width: config.window_width,
                window_height: config.window_height,
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            storage: StorageConfig {
                cache_dir: config.cache_dir.clone(),
            },
            keys: KeysConfig {
                toggle_play_pause: config.key_toggle_play_pause.clone(),
                step_backward: config.key_step_backward.clone(),
                step_forward: config.key_step_forward.clone(),
                skip_backward: config.key_skip_backward.clone(),
                skip_forward: config.key_skip_forward.clone(),
                faster: config.key_faster.clone(),
                slower: config.key_slower.clone(),
                toggle_fullscreen: config.key_toggle_fullscreen.clone(),
                close_session: config.key_close_session.clone(),
                cycle_theme: config.key_cycle_theme.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReadingConfig {
    #[serde(default = "defaults::default_wpm")]
    wpm: u32,
    #[serde(default = "defaults::default_skip_words")]
    skip_words: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        ReadingConfig {
            wpm: defaults::default_wpm(),
            skip_words: defaults::default_skip_words(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_column_width: Option<u32>,
    #[serde(default = "defaults::default_window_width")]
    window_width: f32,
    #[serde(default = "defaults::default_window_height")]
    window_height: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            theme: ThemeMode::default(),
            max_column_width: None,
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct StorageConfig {
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_toggle_play_pause")]
    toggle_play_pause: String,
    #[serde(default = "defaults::default_key_step_backward")]
    step_backward: String,
    #[serde(default = "defaults::default_key_step_forward")]
    step_forward: String,
    #[serde(default = "defaults::default_key_skip_backward")]
    skip_backward: String,
    #[serde(default = "defaults::default_key_skip_forward")]
    skip_forward: String,
    #[serde(default = "defaults::default_key_faster")]
    faster: String,
    #[serde(default = "defaults::default_key_slower")]
    slower: String,
    #[serde(default = "defaults::default_key_toggle_fullscreen")]
    toggle_fullscreen: String,
    #[serde(default = "defaults::default_key_close_session")]
    close_session: String,
    #[serde(default = "defaults::default_key_cycle_theme")]
    cycle_theme: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            toggle_play_pause: defaults::default_key_toggle_play_pause(),
            step_backward: defaults::default_key_step_backward(),
            step_forward: defaults::default_key_step_forward(),
            skip_backward: defaults::default_key_skip_backward(),
            skip_forward: defaults::default_key_skip_forward(),
            faster: defaults::default_key_faster(),
            slower: defaults::default_key_slower(),
            toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            close_session: defaults::default_key_close_session(),
            cycle_theme: defaults::default_key_cycle_theme(),
        }
    }
}
