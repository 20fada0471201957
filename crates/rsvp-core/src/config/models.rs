use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};

/// Flat view of every setting; the on-disk form is grouped into tables.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_wpm")]
    pub wpm: u32,
    #[serde(default = "crate::config::defaults::default_skip_words")]
    pub skip_words: usize,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub max_column_width: Option<u32>,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_play_pause")]
    pub key_toggle_play_pause: String,
    #[serde(default = "crate::config::defaults::default_key_step_backward")]
    pub key_step_backward: String,
    #[serde(default = "crate::config::defaults::default_key_step_forward")]
    pub key_step_forward: String,
    #[serde(default = "crate::config::defaults::default_key_skip_backward")]
    pub key_skip_backward: String,
    #[serde(default = "crate::config::defaults::default_key_skip_forward")]
    pub key_skip_forward: String,
    #[serde(default = "crate::config::defaults::default_key_faster")]
    pub key_faster: String,
    #[serde(default = "crate::config::defaults::default_key_slower")]
    pub key_slower: String,
    #[serde(default = "crate::config::defaults::default_key_toggle_fullscreen")]
    pub key_toggle_fullscreen: String,
    #[serde(default = "crate::config::defaults::default_key_close_session")]
    pub key_close_session: String,
    #[serde(default = "crate::config::defaults::default_key_cycle_theme")]
    pub key_cycle_theme: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        use crate::config::defaults;
        AppConfig {
            wpm: defaults::default_wpm(),
            skip_words: defaults::default_skip_words(),
            theme: ThemeMode::default(),
            max_column_width: None,
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
            log_level: defaults::default_log_level(),
            cache_dir: defaults::default_cache_dir(),
            key_toggle_play_pause: defaults::default_key_toggle_play_pause(),
            key_step_backward: defaults::default_key_step_backward(),
            key_step_forward: defaults::default_key_step_forward(),
            key_skip_backward: defaults::default_key_skip_backward(),
            key_skip_forward: defaults::default_key_skip_forward(),
            key_faster: defaults::default_key_faster(),
            key_slower: defaults::default_key_slower(),
            key_toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            key_close_session: defaults::default_key_close_session(),
            key_cycle_theme: defaults::default_key_cycle_theme(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
