use iced::keyboard::{Key, Modifiers};
use iced::window;
use rsvp_core::bookmarks::ReadPosition;
use rsvp_core::library::{Document, DocumentSummary};
use rsvp_core::session::SessionCommand;
use std::time::Instant;

/// Messages emitted by the UI and by background tasks.
#[derive(Debug, Clone)]
pub enum Message {
    LibraryLoaded(Result<Vec<DocumentSummary>, String>),
    ImportPathChanged(String),
    ImportRequested,
    ImportFinished(Result<String, String>),
    OpenDocument(String),
    DocumentLoaded {
        document: Box<Document>,
        position: Option<ReadPosition>,
    },
    DocumentLoadFailed {
        id: String,
        error: String,
    },
    DeleteDocument(String),
    DocumentDeleted {
        id: String,
        error: Option<String>,
    },
    Reader(SessionCommand),
    /// Pointer position on the progress bar, as a fraction of its length.
    SeekBar(f64),
    CloseSession,
    CycleTheme,
    ToggleFullscreen,
    Frame(Instant),
    PositionSaved {
        document_id: String,
        error: Option<String>,
    },
    ConfigSaved(Option<String>),
    WindowResized {
        id: window::Id,
        width: f32,
        height: f32,
    },
    KeyPressed {
        id: window::Id,
        key: Key,
        modifiers: Modifiers,
    },
    CloseRequested(window::Id),
    PollSystemSignals,
}
