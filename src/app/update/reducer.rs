use super::super::messages::Message;
use super::super::state::{App, Screen};
use super::Effect;
use iced::window;
use rsvp_core::ReaderError;
use rsvp_core::bookmarks::ReadPosition;
use rsvp_core::library::{Document, DocumentSummary};
use rsvp_core::session::{ReaderSession, SessionCommand};
use rsvp_core::tokenizer::tokenize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::LibraryLoaded(result) => self.handle_library_loaded(result),
            Message::ImportPathChanged(path) => self.library.import_path = path,
            Message::ImportRequested => self.handle_import_requested(&mut effects),
            Message::ImportFinished(result) => self.handle_import_finished(result, &mut effects),
            Message::OpenDocument(id) => self.handle_open_document(id, &mut effects),
            Message::DocumentLoaded { document, position } => {
                self.handle_document_loaded(*document, position);
            }
            Message::DocumentLoadFailed { id, error } => {
                warn!(%id, "Failed to open document: {error}");
                self.library.opening = None;
                self.library.error = Some(error);
            }
            Message::DeleteDocument(id) => self.handle_delete_document(id, &mut effects),
            Message::DocumentDeleted { id, error } => {
                if let Some(error) = error {
                    warn!(%id, "Failed to delete document: {error}");
                    self.library.error = Some(error);
                }
                effects.push(Effect::ReloadLibrary);
            }
            Message::Reader(command) => self.handle_reader_command(command, &mut effects),
            Message::SeekBar(fraction) => {
                self.handle_reader_command(SessionCommand::SeekToFraction(fraction), &mut effects);
            }
            Message::CloseSession => self.handle_close_session(&mut effects),
            Message::CycleTheme => {
                self.config.theme = self.config.theme.next();
                info!(theme = %self.config.theme, "Switched theme");
                effects.push(Effect::SaveConfig);
            }
            Message::ToggleFullscreen => self.handle_toggle_fullscreen(&mut effects),
            Message::Frame(now) => self.handle_frame(now, &mut effects),
            Message::PositionSaved { document_id, error } => {
                self.handle_position_saved(document_id, error, &mut effects);
            }
            Message::ConfigSaved(error) => {
                if let Some(error) = error {
                    warn!("Failed to save config: {error}");
                }
            }
            Message::WindowResized { id, width, .. } => self.handle_window_resized(id, width),
            Message::KeyPressed { id, key, modifiers } => {
                self.window_id = Some(id);
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::CloseRequested(id) => {
                self.window_id = Some(id);
                self.handle_quit(&mut effects);
            }
            Message::PollSystemSignals => {
                if crate::take_sigint_requested() {
                    self.handle_quit(&mut effects);
                }
            }
        }

        effects
    }

    fn handle_library_loaded(&mut self, result: Result<Vec<DocumentSummary>, String>) {
        match result {
            Ok(documents) => {
                debug!(count = documents.len(), "Library listing refreshed");
                self.library.documents = documents;
            }
            Err(error) => {
                warn!("Failed to list library: {error}");
                self.library.error = Some(error);
            }
        }
    }

    fn handle_import_requested(&mut self, effects: &mut Vec<Effect>) {
        let raw = self.library.import_path.trim();
        if raw.is_empty() || self.library.importing {
            return;
        }
        self.library.importing = true;
        self.library.error = None;
        effects.push(Effect::ImportDocument(PathBuf::from(raw)));
    }

    fn handle_import_finished(&mut self, result: Result<String, String>, effects: &mut Vec<Effect>) {
        self.library.importing = false;
        match result {
            Ok(id) => {
                info!(%id, "Import finished");
                self.library.import_path.clear();
                effects.push(Effect::ReloadLibrary);
            }
            Err(error) => {
                warn!("Import failed: {error}");
                self.library.error = Some(error);
            }
        }
    }

    fn handle_open_document(&mut self, id: String, effects: &mut Vec<Effect>) {
        if self.session.is_some() {
            self.handle_close_session(effects);
        }
        self.library.error = None;
        self.library.opening = Some(id.clone());
        effects.push(Effect::LoadDocument(id));
    }

    fn handle_document_loaded(&mut self, document: Document, position: Option<ReadPosition>) {
        if self.library.opening.as_deref() != Some(document.id.as_str()) {
            debug!(id = %document.id, "Ignoring stale document load");
            return;
        }
        self.library.opening = None;

        let words = tokenize(&document.text);
        match ReaderSession::from_words(&document, words, position, self.session_settings()) {
            Ok(session) => {
                self.session = Some(session);
                self.screen = Screen::Reading;
            }
            Err(ReaderError::EmptyContent { document_id }) => {
                warn!(id = %document_id, "Refusing to open empty document");
                self.library.error = Some(format!("\"{}\" has no readable words.", document.title));
            }
            Err(err) => {
                warn!(id = %document.id, "Failed to start session: {err}");
                self.library.error = Some(err.to_string());
            }
        }
    }

    fn handle_delete_document(&mut self, id: String, effects: &mut Vec<Effect>) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.document_id() == id)
        {
            warn!(%id, "Refusing to delete the document being read");
            return;
        }
        effects.push(Effect::DeleteDocument(id));
    }

    fn handle_reader_command(&mut self, command: SessionCommand, effects: &mut Vec<Effect>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let event = session.apply_command(command, Instant::now());
        debug!(
            action = event.action,
            index = event.snapshot.index,
            playing = event.snapshot.is_playing,
            "Applied reader command"
        );
        if self.config.wpm != event.snapshot.wpm {
            // Written out when the session closes rather than per slider step.
            self.config.wpm = event.snapshot.wpm;
            self.config_dirty = true;
        }
        if let Some(position) = event.position {
            self.queue_position(position, effects);
        }
    }

    /// Dispatch a write now, or park it behind the one in flight.
    fn queue_position(&mut self, position: ReadPosition, effects: &mut Vec<Effect>) {
        if let Some(position) = self.writer.submit(position) {
            effects.push(Effect::WritePosition(position));
        }
    }

    fn handle_frame(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(position) = session.tick(now) {
            self.queue_position(position, effects);
        }
    }

    fn handle_close_session(&mut self, effects: &mut Vec<Effect>) {
        let Some(session) = self.session.take() else {
            return;
        };
        info!(id = %session.document_id(), index = session.index(), "Closing reading session");
        if let Some(position) = session.close() {
            self.queue_position(position, effects);
        }
        self.screen = Screen::Library;
        if self.config_dirty {
            effects.push(Effect::SaveConfig);
        }
        effects.push(Effect::ReloadLibrary);
    }

    fn handle_quit(&mut self, effects: &mut Vec<Effect>) {
        if self.quitting {
            return;
        }
        self.quitting = true;
        info!("Quit requested; flushing reading position");
        if let Some(session) = self.session.take() {
            if let Some(position) = session.close() {
                self.queue_position(position, effects);
            }
        }
        if self.writer.is_idle() {
            effects.push(Effect::Exit);
        }
    }

    fn handle_toggle_fullscreen(&mut self, effects: &mut Vec<Effect>) {
        self.fullscreen = !self.fullscreen;
        let mode = if self.fullscreen {
            window::Mode::Fullscreen
        } else {
            window::Mode::Windowed
        };
        effects.push(Effect::SetWindowMode(mode));
    }

    fn handle_position_saved(
        &mut self,
        document_id: String,
        error: Option<String>,
        effects: &mut Vec<Effect>,
    ) {
        if let Some(error) = error {
            // Progress keeps working in memory; only durability is lost.
            warn!(%document_id, "Position save failed: {error}");
        }
        match self.writer.complete(&document_id) {
            Some(next) => {
                debug!(
                    %document_id,
                    parked = self.writer.pending_count(),
                    "Dispatching parked position write"
                );
                effects.push(Effect::WritePosition(next));
            }
            None if self.quitting => {
                if self.writer.is_idle() {
                    effects.push(Effect::Exit);
                }
            }
            None if self.session.is_none() => effects.push(Effect::ReloadLibrary),
            None => {}
        }
    }

    fn handle_window_resized(&mut self, id: window::Id, width: f32) {
        self.window_id = Some(id);
        self.viewport_width = width;
        if let Some(session) = self.session.as_mut() {
            session.set_viewport_width(width.max(0.0) as u32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_core::bookmarks::percentage_for_index;
    use rsvp_core::config::AppConfig;
    use rsvp_core::session::SessionSettings;
    use std::time::Duration;

    fn reading_app(word_count: usize) -> App {
        let document = Document {
            id: "doc".to_string(),
            title: "Doc".to_string(),
            author: "Anon".to_string(),
            text: (0..word_count)
                .map(|i| format!("w{i}"))
                .collect::<Vec<_>>()
                .join(" "),
            source_path: None,
            added_at_ms: 0,
        };
        let session = ReaderSession::from_words(
            &document,
            tokenize(&document.text),
            None,
            SessionSettings::default(),
        )
        .expect("session opens");
        let mut app = App::new(AppConfig::default());
        app.session = Some(session);
        app.screen = Screen::Reading;
        app
    }

    fn written(effects: &[Effect]) -> Vec<f64> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::WritePosition(position) => Some(position.percentage),
                _ => None,
            })
            .collect()
    }

    fn saved(document_id: &str, error: Option<&str>) -> Message {
        Message::PositionSaved {
            document_id: document_id.to_string(),
            error: error.map(str::to_string),
        }
    }

    fn index(app: &App) -> usize {
        app.session.as_ref().map(ReaderSession::index).expect("session")
    }

    #[test]
    fn completed_write_dispatches_newest_parked_position() {
        let mut app = reading_app(100);

        let first = app.reduce(Message::Reader(SessionCommand::StepForward));
        assert_eq!(written(&first), vec![percentage_for_index(1, 100)]);
        assert!(written(&app.reduce(Message::Reader(SessionCommand::StepForward))).is_empty());
        assert!(written(&app.reduce(Message::Reader(SessionCommand::StepForward))).is_empty());

        let next = app.reduce(saved("doc", None));
        assert_eq!(written(&next), vec![percentage_for_index(3, 100)]);

        let drained = app.reduce(saved("doc", None));
        assert!(written(&drained).is_empty());
        assert!(app.writer.is_idle());
    }

    #[test]
    fn close_session_stops_frames_and_flushes_final_position() {
        let mut app = reading_app(100);
        app.reduce(Message::Reader(SessionCommand::SkipForward));
        app.reduce(saved("doc", None));
        app.reduce(Message::Reader(SessionCommand::Play));
        assert!(app.wants_frames());

        let effects = app.reduce(Message::CloseSession);

        assert!(app.session.is_none());
        assert!(!app.wants_frames());
        assert_eq!(app.screen, Screen::Library);
        assert_eq!(written(&effects), vec![percentage_for_index(10, 100)]);
    }

    #[test]
    fn failed_save_keeps_playback_running() {
        let mut app = reading_app(100);
        app.reduce(Message::Reader(SessionCommand::Play));
        let effects = app.reduce(Message::Frame(Instant::now() + Duration::from_secs(1)));
        assert_eq!(written(&effects).len(), 1);

        app.reduce(saved("doc", Some("disk full")));

        assert!(app.wants_frames());
        assert_eq!(index(&app), 1);
        assert!(app.writer.is_idle());
    }

    #[test]
    fn quit_waits_for_in_flight_write_before_exit() {
        let mut app = reading_app(100);
        app.reduce(Message::Reader(SessionCommand::StepForward));

        let effects = app.reduce(Message::CloseRequested(window::Id::unique()));
        assert!(app.session.is_none());
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::Exit)));

        let effects = app.reduce(saved("doc", None));
        assert_eq!(written(&effects), vec![percentage_for_index(1, 100)]);
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::Exit)));

        let effects = app.reduce(saved("doc", None));
        assert!(effects.iter().any(|effect| matches!(effect, Effect::Exit)));
    }

    #[test]
    fn quit_without_pending_writes_exits_immediately() {
        let mut app = App::new(AppConfig::default());
        let effects = app.reduce(Message::CloseRequested(window::Id::unique()));
        assert!(matches!(effects.as_slice(), [Effect::Exit]));
    }

    #[test]
    fn rate_changes_are_saved_on_close_not_per_step() {
        let mut app = reading_app(10);
        for _ in 0..3 {
            let effects = app.reduce(Message::Reader(SessionCommand::Faster));
            assert!(!effects.iter().any(|effect| matches!(effect, Effect::SaveConfig)));
        }
        assert_eq!(app.config.wpm, 330);
        assert!(app.config_dirty);

        let effects = app.reduce(Message::CloseSession);
        assert!(effects.iter().any(|effect| matches!(effect, Effect::SaveConfig)));
    }
}
