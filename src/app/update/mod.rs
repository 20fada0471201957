mod reducer;
mod runtime;
mod shortcuts;

use super::messages::Message;
use super::state::App;
use iced::{Subscription, Task, event, time, window};
use rsvp_core::bookmarks::ReadPosition;
use std::path::PathBuf;
use std::time::Duration;

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug)]
pub(super) enum Effect {
    /// Write a position the per-document queue has cleared.
    WritePosition(ReadPosition),
    SaveConfig,
    ReloadLibrary,
    ImportDocument(PathBuf),
    LoadDocument(String),
    DeleteDocument(String),
    SetWindowMode(window::Mode),
    /// Close the window. Only emitted once no position write is in flight.
    Exit,
}

impl App {
    pub fn subscription(app: &App) -> Subscription<Message> {
        let mut subscriptions: Vec<Subscription<Message>> = vec![
            event::listen_with(runtime::runtime_event_to_message),
            time::every(Duration::from_millis(250)).map(|_| Message::PollSystemSignals),
        ];

        if app.wants_frames() {
            subscriptions.push(window::frames().map(Message::Frame));
        }

        Subscription::batch(subscriptions)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let effects = self.reduce(message);
        if effects.is_empty() {
            Task::none()
        } else {
            Task::batch(effects.into_iter().map(|effect| self.run_effect(effect)))
        }
    }
}
