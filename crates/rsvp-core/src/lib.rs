//! Playback and typography core for one-word-at-a-time reading.
//!
//! Nothing in here knows about a GUI toolkit. Time is always handed in as an
//! [`std::time::Instant`], storage sits behind the [`PositionStore`] and
//! [`DocumentStore`] traits, and the shell decides when to schedule frames.

pub mod bookmarks;
pub mod clock;
pub mod config;
pub mod error;
pub mod fixation;
pub mod ingest;
pub mod library;
pub mod session;
pub mod teardown;
pub mod theme;
pub mod tokenizer;
pub mod typography;

pub use bookmarks::{PositionStore, PositionWriter, ReadPosition};
pub use clock::{ClockState, PlaybackClock};
pub use error::{IngestError, ReaderError};
pub use library::{Document, DocumentStore, DocumentSummary, FileLibrary, MemoryLibrary};
pub use session::{ReaderSession, ReaderSnapshot, SessionCommand, SessionEvent};
pub use tokenizer::{WordSequence, tokenize};
