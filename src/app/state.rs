use super::messages::Message;
use super::palette;
use iced::{Task, Theme, window};
use rsvp_core::bookmarks::PositionWriter;
use rsvp_core::config::{AppConfig, save_config};
use rsvp_core::library::{self, DocumentStore, DocumentSummary};
use rsvp_core::session::{ReaderSession, SessionSettings};
use std::path::Path;
use tracing::{info, warn};

/// Which top-level view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Screen {
    Library,
    Reading,
}

#[derive(Debug, Default)]
pub(super) struct LibraryState {
    pub(super) documents: Vec<DocumentSummary>,
    pub(super) import_path: String,
    pub(super) importing: bool,
    pub(super) error: Option<String>,
    pub(super) opening: Option<String>,
}

/// Core application state.
pub struct App {
    pub(super) config: AppConfig,
    /// Set when the reading rate changed and the config file is behind.
    pub(super) config_dirty: bool,
    pub(super) screen: Screen,
    pub(super) library: LibraryState,
    pub(super) session: Option<ReaderSession>,
    pub(super) writer: PositionWriter,
    pub(super) window_id: Option<window::Id>,
    pub(super) viewport_width: f32,
    pub(super) fullscreen: bool,
    /// Exit requested; the window closes once every position write lands.
    pub(super) quitting: bool,
}

impl App {
    pub(super) fn new(config: AppConfig) -> App {
        let viewport_width = config.window_width;
        App {
            config,
            config_dirty: false,
            screen: Screen::Library,
            library: LibraryState::default(),
            session: None,
            writer: PositionWriter::new(),
            window_id: None,
            viewport_width,
            fullscreen: false,
            quitting: false,
        }
    }

    pub fn bootstrap(config: AppConfig, initial_document: Option<String>) -> (App, Task<Message>) {
        let app = App::new(config);
        let mut tasks = vec![Self::load_library_task()];
        if let Some(id) = initial_document {
            tasks.push(Task::done(Message::OpenDocument(id)));
        }
        (app, Task::batch(tasks))
    }

    pub fn theme(&self) -> Theme {
        palette::iced_theme(self.config.theme)
    }

    /// Frames are only requested while a word clock is running.
    pub(super) fn wants_frames(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_playing())
    }

    pub(super) fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            viewport_width: self.viewport_width.max(0.0) as u32,
            ..SessionSettings::from(&self.config)
        }
    }

    pub(super) fn load_library_task() -> Task<Message> {
        Task::perform(
            async move { library::global().list().map_err(|err| err.to_string()) },
            Message::LibraryLoaded,
        )
    }

    pub(super) fn save_config_task(&mut self) -> Task<Message> {
        self.config_dirty = false;
        let config = self.config.clone();
        Task::perform(
            async move {
                save_config(Path::new(crate::CONFIG_PATH), &config)
                    .err()
                    .map(|err| format!("{err:#}"))
            },
            Message::ConfigSaved,
        )
    }

    /// Last-chance config write on exit, when no task result can arrive.
    pub(super) fn flush_config_on_exit(&mut self) {
        if !self.config_dirty {
            return;
        }
        self.config_dirty = false;
        match save_config(Path::new(crate::CONFIG_PATH), &self.config) {
            Ok(()) => info!("Saved config on exit"),
            Err(err) => warn!("Failed to save config: {err:#}"),
        }
    }
}
