//! Presentation controller: one reading session over one document.
//!
//! The session owns the word sequence, the current index and the playback
//! clock. It performs no I/O after opening; every index change comes back to
//! the caller as a [`ReadPosition`] to persist.

use crate::bookmarks::{PositionStore, ReadPosition, percentage_for_index};
use crate::clock::{PlaybackClock, clamp_wpm};
use crate::config::AppConfig;
use crate::error::ReaderError;
use crate::fixation::split_at_fixation;
use crate::library::Document;
use crate::teardown::Teardown;
use crate::tokenizer::{WordSequence, tokenize};
use crate::typography::GlyphSizer;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_SKIP_WORDS: usize = 10;
pub const WPM_STEP: u32 = 10;

/// Per-session knobs taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub wpm: u32,
    pub skip_words: usize,
    pub viewport_width: u32,
    pub sizer: GlyphSizer,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            wpm: crate::clock::DEFAULT_WPM,
            skip_words: DEFAULT_SKIP_WORDS,
            viewport_width: 0,
            sizer: GlyphSizer::default(),
        }
    }
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            wpm: config.wpm,
            skip_words: config.skip_words,
            viewport_width: config.window_width.max(0.0) as u32,
            sizer: GlyphSizer::new(config.max_column_width),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    GetSnapshot,
    PlayPause,
    Play,
    Pause,
    StepBackward,
    StepForward,
    SkipBackward,
    SkipForward,
    SeekToFraction(f64),
    SetRate(u32),
    Faster,
    Slower,
    SetViewportWidth(u32),
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::PlayPause => "reader_play_pause",
            Self::Play => "reader_play",
            Self::Pause => "reader_pause",
            Self::StepBackward => "reader_step_backward",
            Self::StepForward => "reader_step_forward",
            Self::SkipBackward => "reader_skip_backward",
            Self::SkipForward => "reader_skip_forward",
            Self::SeekToFraction(_) => "reader_seek_to_fraction",
            Self::SetRate(_) => "reader_set_rate",
            Self::Faster => "reader_faster",
            Self::Slower => "reader_slower",
            Self::SetViewportWidth(_) => "reader_set_viewport_width",
        }
    }
}

/// Everything the view needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSnapshot {
    pub document_id: String,
    pub title: String,
    pub author: String,
    pub word: String,
    pub before_pivot: String,
    pub pivot: String,
    pub after_pivot: String,
    pub font_size: u32,
    pub index: usize,
    pub word_count: usize,
    pub progress_pct: f64,
    pub words_remaining: usize,
    pub seconds_remaining: f64,
    pub is_playing: bool,
    pub wpm: u32,
    pub viewport_width: u32,
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: ReaderSnapshot,
    /// Set whenever the command moved the current index.
    pub position: Option<ReadPosition>,
}

pub struct ReaderSession {
    document_id: String,
    title: String,
    author: String,
    words: WordSequence,
    index: usize,
    clock: PlaybackClock,
    skip_words: usize,
    viewport_width: u32,
    sizer: GlyphSizer,
    moved: bool,
    final_position: Option<ReadPosition>,
    teardown: Teardown<ReaderSession>,
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("document_id", &self.document_id)
            .field("index", &self.index)
            .field("word_count", &self.words.len())
            .field("clock", &self.clock)
            .field("teardown", &self.teardown)
            .finish_non_exhaustive()
    }
}

impl ReaderSession {
    /// Tokenize `document`, restore its saved position and get ready to play.
    ///
    /// A store failure is logged and treated as "no saved position".
    pub fn open<S: PositionStore + ?Sized>(
        document: &Document,
        store: &S,
        settings: SessionSettings,
    ) -> Result<Self, ReaderError> {
        let words = tokenize(&document.text);
        if words.is_empty() {
            warn!(id = %document.id, "Document has no readable words");
            return Err(ReaderError::EmptyContent {
                document_id: document.id.clone(),
            });
        }
        let saved = match store.get_position(&document.id) {
            Ok(saved) => saved,
            Err(err) => {
                warn!(id = %document.id, "Continuing without saved position: {err}");
                None
            }
        };
        Self::from_words(document, words, saved, settings)
    }

    /// Build a session from an already-tokenized sequence and an optional
    /// saved position.
    pub fn from_words(
        document: &Document,
        words: WordSequence,
        saved: Option<ReadPosition>,
        settings: SessionSettings,
    ) -> Result<Self, ReaderError> {
        if words.is_empty() {
            return Err(ReaderError::EmptyContent {
                document_id: document.id.clone(),
            });
        }
        let index = saved
            .as_ref()
            .filter(|position| position.percentage > 0.0)
            .map(|position| position.index_for(words.len()))
            .unwrap_or(0);

        let mut session = Self {
            document_id: document.id.clone(),
            title: document.title.clone(),
            author: document.author.clone(),
            words,
            index,
            clock: PlaybackClock::new(settings.wpm),
            skip_words: settings.skip_words.max(1),
            viewport_width: settings.viewport_width,
            sizer: settings.sizer,
            moved: false,
            final_position: None,
            teardown: Teardown::new(),
        };
        session.teardown.defer("final position", |session: &mut ReaderSession| {
            session.final_position = session.moved.then(|| session.current_position());
        });
        session.teardown.defer("playback clock", |session: &mut ReaderSession| {
            session.clock.stop();
        });

        info!(
            id = %session.document_id,
            words = session.words.len(),
            index = session.index,
            restored = saved.is_some(),
            "Opened reading session"
        );
        Ok(session)
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn current_word(&self) -> &str {
        self.words.get(self.index).unwrap_or("")
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    pub fn wpm(&self) -> u32 {
        self.clock.wpm()
    }

    pub fn current_position(&self) -> ReadPosition {
        ReadPosition::new(self.document_id.clone(), self.index, self.words.len())
    }

    fn last_index(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    /// Clamp and apply a new index. Returns the position to persist when it
    /// actually moved.
    fn move_to(&mut self, index: usize) -> Option<ReadPosition> {
        let clamped = index.min(self.last_index());
        if clamped == self.index {
            return None;
        }
        self.index = clamped;
        self.moved = true;
        Some(self.current_position())
    }

    fn seek_to(&mut self, index: usize) -> Option<ReadPosition> {
        self.pause();
        self.move_to(index)
    }

    pub fn play(&mut self, now: Instant) -> bool {
        self.clock.start(now, self.index, self.words.len())
    }

    pub fn pause(&mut self) {
        self.clock.stop();
    }

    pub fn play_pause(&mut self, now: Instant) {
        if self.clock.is_running() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    pub fn step_backward(&mut self) -> Option<ReadPosition> {
        self.seek_to(self.index.saturating_sub(1))
    }

    pub fn step_forward(&mut self) -> Option<ReadPosition> {
        self.seek_to(self.index.saturating_add(1))
    }

    pub fn skip_backward(&mut self) -> Option<ReadPosition> {
        self.seek_to(self.index.saturating_sub(self.skip_words))
    }

    pub fn skip_forward(&mut self) -> Option<ReadPosition> {
        self.seek_to(self.index.saturating_add(self.skip_words))
    }

    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<ReadPosition> {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = (fraction * self.words.len() as f64).floor() as usize;
        self.seek_to(target)
    }

    /// Change the rate without touching the index or the play state.
    pub fn set_rate(&mut self, wpm: u32) {
        self.clock.set_wpm(wpm);
        debug!(wpm = self.clock.wpm(), "Playback rate changed");
    }

    pub fn adjust_rate(&mut self, increase: bool) {
        let current = self.clock.wpm();
        let next = if increase {
            current.saturating_add(WPM_STEP)
        } else {
            current.saturating_sub(WPM_STEP)
        };
        self.set_rate(clamp_wpm(next));
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    /// Frame callback. Advances at most one word and stops on the last one.
    pub fn tick(&mut self, now: Instant) -> Option<ReadPosition> {
        if !self.clock.tick(now) {
            return None;
        }
        let position = self.move_to(self.index + 1);
        if self.index >= self.last_index() {
            self.clock.stop();
            info!(id = %self.document_id, "Reached end of document");
        }
        position
    }

    pub fn apply_command(&mut self, command: SessionCommand, now: Instant) -> SessionEvent {
        let action = command.action();
        let position = match command {
            SessionCommand::GetSnapshot => None,
            SessionCommand::PlayPause => {
                self.play_pause(now);
                None
            }
            SessionCommand::Play => {
                self.play(now);
                None
            }
            SessionCommand::Pause => {
                self.pause();
                None
            }
            SessionCommand::StepBackward => self.step_backward(),
            SessionCommand::StepForward => self.step_forward(),
            SessionCommand::SkipBackward => self.skip_backward(),
            SessionCommand::SkipForward => self.skip_forward(),
            SessionCommand::SeekToFraction(fraction) => self.seek_to_fraction(fraction),
            SessionCommand::SetRate(wpm) => {
                self.set_rate(wpm);
                None
            }
            SessionCommand::Faster => {
                self.adjust_rate(true);
                None
            }
            SessionCommand::Slower => {
                self.adjust_rate(false);
                None
            }
            SessionCommand::SetViewportWidth(width) => {
                self.set_viewport_width(width);
                None
            }
        };
        SessionEvent {
            action,
            snapshot: self.snapshot(),
            position,
        }
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        let word = self.current_word();
        let parts = split_at_fixation(word);
        let words_remaining = self.words.remaining_from(self.index + 1);
        ReaderSnapshot {
            document_id: self.document_id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            word: word.to_string(),
            before_pivot: parts.before.to_string(),
            pivot: parts.pivot.to_string(),
            after_pivot: parts.after.to_string(),
            font_size: self.sizer.font_size_for_word(word, self.viewport_width),
            index: self.index,
            word_count: self.words.len(),
            progress_pct: percentage_for_index(self.index, self.words.len()),
            words_remaining,
            seconds_remaining: words_remaining as f64 * 60.0 / f64::from(self.clock.wpm()),
            is_playing: self.clock.is_running(),
            wpm: self.clock.wpm(),
            viewport_width: self.viewport_width,
        }
    }

    /// Stop the clock, then hand back the final position if the index moved
    /// during this session.
    pub fn close(mut self) -> Option<ReadPosition> {
        self.release();
        self.final_position.take()
    }

    fn release(&mut self) {
        let mut teardown = std::mem::take(&mut self.teardown);
        teardown.run(self);
    }
}

impl Drop for ReaderSession {
    fn drop(&mut self) {
        if !self.teardown.is_empty() {
            debug!(id = %self.document_id, "Session dropped without close");
            self.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryLibrary;
    use std::time::Duration;

    struct FailingStore;

    impl PositionStore for FailingStore {
        fn get_position(&self, _document_id: &str) -> Result<Option<ReadPosition>, ReaderError> {
            Err(ReaderError::persistence("get", anyhow::anyhow!("offline")))
        }

        fn save_position(&self, _position: &ReadPosition) -> Result<(), ReaderError> {
            Err(ReaderError::persistence("save", anyhow::anyhow!("offline")))
        }
    }

    fn document_with_words(count: usize) -> Document {
        let text = (0..count)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        Document {
            id: "doc".to_string(),
            title: "Doc".to_string(),
            author: "Anon".to_string(),
            text,
            source_path: None,
            added_at_ms: 0,
        }
    }

    fn open(count: usize) -> ReaderSession {
        ReaderSession::open(
            &document_with_words(count),
            &MemoryLibrary::new(),
            SessionSettings::default(),
        )
        .expect("session opens")
    }

    fn saved(percentage: f64) -> ReadPosition {
        ReadPosition {
            document_id: "doc".to_string(),
            percentage,
            updated_at_ms: 1,
        }
    }

    #[test]
    fn restores_index_from_saved_percentage() {
        let store = MemoryLibrary::new();
        store.save_position(&saved(25.0)).expect("save");

        let session =
            ReaderSession::open(&document_with_words(200), &store, SessionSettings::default())
                .expect("opens");

        assert_eq!(session.index(), 50);
    }

    #[test]
    fn saved_percentage_beyond_document_is_clamped() {
        let store = MemoryLibrary::new();
        store.save_position(&saved(180.0)).expect("save");

        let session =
            ReaderSession::open(&document_with_words(10), &store, SessionSettings::default())
                .expect("opens");

        assert_eq!(session.index(), 9);
    }

    #[test]
    fn zero_percentage_starts_at_beginning() {
        let store = MemoryLibrary::new();
        store.save_position(&saved(0.0)).expect("save");
        let session =
            ReaderSession::open(&document_with_words(10), &store, SessionSettings::default())
                .expect("opens");
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn empty_document_is_refused() {
        let mut document = document_with_words(0);
        document.text = "   \n\t ".to_string();

        let err = ReaderSession::open(&document, &MemoryLibrary::new(), SessionSettings::default())
            .expect_err("empty document");

        assert!(matches!(err, ReaderError::EmptyContent { .. }));
        assert!(err.is_terminal());
    }

    #[test]
    fn store_failure_degrades_to_session_only_progress() {
        let mut session = ReaderSession::open(
            &document_with_words(20),
            &FailingStore,
            SessionSettings::default(),
        )
        .expect("opens despite store failure");

        assert_eq!(session.index(), 0);
        assert!(session.step_forward().is_some());
    }

    #[test]
    fn every_index_change_yields_a_position() {
        let mut session = open(200);
        let position = session.skip_forward().expect("moved");
        assert_eq!(position.document_id, "doc");
        assert_eq!(position.percentage, 5.0);

        let position = session.step_backward().expect("moved");
        assert_eq!(position.index_for(200), 9);
    }

    #[test]
    fn seeking_always_pauses() {
        let now = Instant::now();
        let mut session = open(100);

        assert!(session.play(now));
        session.skip_forward();
        assert!(!session.is_playing());
        assert_eq!(session.index(), 10);

        session.play(now);
        session.step_backward();
        assert!(!session.is_playing());

        session.play(now);
        session.seek_to_fraction(0.5);
        assert!(!session.is_playing());
        assert_eq!(session.index(), 50);
    }

    #[test]
    fn step_forward_at_last_word_is_a_no_op() {
        let mut session = open(3);
        session.seek_to_fraction(1.0);
        assert_eq!(session.index(), 2);

        assert!(session.step_forward().is_none());
        assert!(session.skip_forward().is_none());
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn backward_moves_stop_at_first_word() {
        let mut session = open(30);
        session.step_forward();
        session.skip_backward();
        assert_eq!(session.index(), 0);
        assert!(session.step_backward().is_none());
    }

    #[test]
    fn seek_fraction_is_clamped() {
        let mut session = open(40);
        session.seek_to_fraction(7.0);
        assert_eq!(session.index(), 39);
        session.seek_to_fraction(-1.0);
        assert_eq!(session.index(), 0);
        session.seek_to_fraction(f64::NAN);
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn rate_change_keeps_index_and_play_state() {
        let now = Instant::now();
        let mut session = open(50);
        session.step_forward();
        session.play(now);

        session.set_rate(600);

        assert_eq!(session.index(), 1);
        assert!(session.is_playing());
        assert_eq!(session.wpm(), 600);

        session.set_rate(50);
        assert_eq!(session.wpm(), 100);
    }

    #[test]
    fn faster_and_slower_step_by_ten() {
        let mut session = open(5);
        session.adjust_rate(true);
        assert_eq!(session.wpm(), 310);
        session.adjust_rate(false);
        session.adjust_rate(false);
        assert_eq!(session.wpm(), 290);
    }

    #[test]
    fn ticking_advances_and_stops_at_the_end() {
        let start = Instant::now();
        let mut session = open(3);
        assert!(session.play(start));

        let first = session.tick(start + Duration::from_millis(200));
        assert!(first.is_some());
        assert_eq!(session.index(), 1);
        assert!(session.is_playing());

        let second = session.tick(start + Duration::from_millis(400));
        assert!(second.is_some());
        assert_eq!(session.index(), 2);
        assert!(!session.is_playing());

        assert!(session.tick(start + Duration::from_millis(600)).is_none());
        assert!(!session.play(start));
    }

    #[test]
    fn single_word_document_never_plays() {
        let mut session = open(1);
        assert!(!session.play(Instant::now()));
        assert!(!session.is_playing());
    }

    #[test]
    fn one_second_of_playback_reads_five_words() {
        let start = Instant::now();
        let mut session = open(100);
        session.play(start);
        let mut now = start;
        for _ in 0..60 {
            now += Duration::from_millis(16);
            session.tick(now);
        }
        now = start + Duration::from_millis(1000);
        session.tick(now);
        assert!((4..=6).contains(&session.index()), "index {}", session.index());
    }

    #[test]
    fn command_dispatch_emits_action_snapshot_and_position() {
        let now = Instant::now();
        let mut session = open(100);

        let event = session.apply_command(SessionCommand::SkipForward, now);
        assert_eq!(event.action, "reader_skip_forward");
        assert_eq!(event.snapshot.index, 10);
        assert_eq!(event.snapshot.word, "w10");
        assert!(event.position.is_some());

        let event = session.apply_command(SessionCommand::PlayPause, now);
        assert_eq!(event.action, "reader_play_pause");
        assert!(event.snapshot.is_playing);
        assert!(event.position.is_none());

        let event = session.apply_command(SessionCommand::SkipForward, now);
        assert!(!event.snapshot.is_playing);
    }

    #[test]
    fn snapshot_carries_fixation_and_size() {
        let document = Document {
            text: "reading quickly".to_string(),
            ..document_with_words(1)
        };
        let settings = SessionSettings {
            viewport_width: 768,
            ..SessionSettings::default()
        };
        let session =
            ReaderSession::open(&document, &MemoryLibrary::new(), settings).expect("opens");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.before_pivot, "re");
        assert_eq!(snapshot.pivot, "a");
        assert_eq!(snapshot.after_pivot, "ding");
        assert_eq!(snapshot.font_size, 96);
        assert_eq!(snapshot.words_remaining, 1);
        assert!((snapshot.seconds_remaining - 0.2).abs() < 1e-9);
    }

    #[test]
    fn close_stops_clock_and_flushes_final_position() {
        let mut session = open(100);
        session.skip_forward();
        session.play(Instant::now());

        let last = session.close().expect("moved during session");

        assert_eq!(last.index_for(100), 10);
    }

    #[test]
    fn close_without_movement_has_nothing_to_flush() {
        let session = open(100);
        assert!(session.close().is_none());
    }
}
