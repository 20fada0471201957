use super::super::messages::Message;
use super::super::state::App;
use super::Effect;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::window;
use rsvp_core::bookmarks::{PositionStore, ReadPosition};
use rsvp_core::library::{self, DocumentStore, import_document};
use tracing::{info, warn};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::WritePosition(position) => write_position(position),
            Effect::SaveConfig => self.save_config_task(),
            Effect::ReloadLibrary => Self::load_library_task(),
            Effect::ImportDocument(path) => {
                info!(path = %path.display(), "Dispatching import task");
                Task::perform(
                    async move {
                        import_document(library::global(), &path)
                            .map(|document| document.id)
                            .map_err(|err| err.to_string())
                    },
                    Message::ImportFinished,
                )
            }
            Effect::LoadDocument(id) => Task::perform(
                async move {
                    let store = library::global();
                    match store.get(&id) {
                        Ok(Some(document)) => {
                            let position = match store.get_position(&id) {
                                Ok(position) => position,
                                Err(err) => {
                                    warn!(%id, "Continuing without saved position: {err}");
                                    None
                                }
                            };
                            Message::DocumentLoaded {
                                document: Box::new(document),
                                position,
                            }
                        }
                        Ok(None) => Message::DocumentLoadFailed {
                            id,
                            error: "Document is no longer in the library.".to_string(),
                        },
                        Err(err) => Message::DocumentLoadFailed {
                            id,
                            error: err.to_string(),
                        },
                    }
                },
                |message| message,
            ),
            Effect::DeleteDocument(id) => Task::perform(
                async move {
                    let error = library::global().delete(&id).err().map(|err| err.to_string());
                    Message::DocumentDeleted { id, error }
                },
                |message| message,
            ),
            Effect::SetWindowMode(mode) => match self.window_id {
                Some(id) => window::change_mode(id, mode),
                None => {
                    warn!("No window id yet; ignoring window mode change");
                    Task::none()
                }
            },
            Effect::Exit => {
                self.flush_config_on_exit();
                info!("Exiting");
                iced::exit()
            }
        }
    }
}

fn write_position(position: ReadPosition) -> Task<Message> {
    Task::perform(
        async move {
            let document_id = position.document_id.clone();
            let error = library::global()
                .save_position(&position)
                .err()
                .map(|err| err.to_string());
            Message::PositionSaved { document_id, error }
        },
        |message| message,
    )
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    window_id: window::Id,
) -> Option<Message> {
    if let Event::Window(window::Event::CloseRequested) = event {
        return Some(Message::CloseRequested(window_id));
    }
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Opened { size, .. })
        | Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            id: window_id,
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed {
                id: window_id,
                key,
                modifiers,
            })
        }
        _ => None,
    }
}
