mod messages;
mod palette;
mod state;
mod update;
mod view;

pub use state::App;

use iced::{Size, window};
use rsvp_core::config::AppConfig;

/// Launch the reader window. `initial_document` is opened straight away.
pub fn run_app(config: AppConfig, initial_document: Option<String>) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        min_size: Some(Size::new(320.0, 240.0)),
        exit_on_close_request: false,
        ..window::Settings::default()
    };

    iced::application("Speed Reader", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(App::theme)
        .run_with(move || App::bootstrap(config, initial_document))
}
