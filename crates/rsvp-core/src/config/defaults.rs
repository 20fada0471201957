pub(crate) fn default_wpm() -> u32 {
    crate::clock::DEFAULT_WPM
}

pub(crate) fn default_skip_words() -> usize {
    10
}

pub(crate) fn default_window_width() -> f32 {
    1024.0
}

pub(crate) fn default_window_height() -> f32 {
    640.0
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_key_toggle_play_pause() -> String {
    "space".to_string()
}

pub(crate) fn default_key_step_backward() -> String {
    "left".to_string()
}

pub(crate) fn default_key_step_forward() -> String {
    "right".to_string()
}

pub(crate) fn default_key_skip_backward() -> String {
    "shift+left".to_string()
}

pub(crate) fn default_key_skip_forward() -> String {
    "shift+right".to_string()
}

pub(crate) fn default_key_faster() -> String {
    "up".to_string()
}

pub(crate) fn default_key_slower() -> String {
    "down".to_string()
}

pub(crate) fn default_key_toggle_fullscreen() -> String {
    "f".to_string()
}

pub(crate) fn default_key_close_session() -> String {
    "escape".to_string()
}

pub(crate) fn default_key_cycle_theme() -> String {
    "t".to_string()
}
