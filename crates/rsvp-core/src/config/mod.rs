//! Configuration loading for the reader.
//!
//! User-tunable settings live in `conf/config.toml`. Missing or invalid
//! entries fall back to defaults so the reader always launches.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{clamp_config, load_config, parse_config, save_config, serialize_config};
pub use models::{AppConfig, LogLevel};
