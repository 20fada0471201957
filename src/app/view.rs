use super::messages::Message;
use super::palette::color;
use super::state::{App, Screen};
use iced::alignment::Vertical;
use iced::widget::{
    Column, button, column, container, horizontal_space, row, scrollable, slider, text,
    text_input,
};
use iced::{Border, Color, Element, Font, Length};
use rsvp_core::clock::{MAX_WPM, MIN_WPM};
use rsvp_core::library::DocumentSummary;
use rsvp_core::session::{ReaderSession, SessionCommand};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        match (self.screen, self.session.as_ref()) {
            (Screen::Reading, Some(session)) => self.reading_view(session),
            _ => self.library_view(),
        }
    }

    fn library_view(&self) -> Element<'_, Message> {
        let tokens = self.config.theme.tokens();

        let header = row![
            text("Library").size(28),
            horizontal_space(),
            button(text(format!("Theme: {}", self.config.theme))).on_press(Message::CycleTheme),
        ]
        .spacing(10)
        .align_y(Vertical::Center);

        let import_button = button(if self.library.importing {
            "Importing..."
        } else {
            "Import"
        })
        .on_press_maybe(
            (!self.library.importing && !self.library.import_path.trim().is_empty())
                .then_some(Message::ImportRequested),
        );
        let import_row = row![
            text_input("Path to a .txt, .md or .epub file", &self.library.import_path)
                .on_input(Message::ImportPathChanged)
                .on_submit(Message::ImportRequested)
                .width(Length::Fill),
            import_button,
        ]
        .spacing(10)
        .align_y(Vertical::Center);

        let mut content: Column<'_, Message> = column![header, import_row].spacing(16);

        if let Some(error) = &self.library.error {
            content = content.push(text(error.as_str()).color(color(tokens.fixation)));
        }

        let list: Element<'_, Message> = if self.library.documents.is_empty() {
            text("No documents yet. Import a file to start reading.")
                .color(color(tokens.muted))
                .into()
        } else {
            let rows = self
                .library
                .documents
                .iter()
                .map(|document| self.document_row(document));
            scrollable(Column::with_children(rows).spacing(8))
                .height(Length::Fill)
                .into()
        };

        container(content.push(list))
            .padding(24)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn document_row<'a>(&'a self, document: &'a DocumentSummary) -> Element<'a, Message> {
        let tokens = self.config.theme.tokens();
        let opening = self.library.opening.as_deref() == Some(document.id.as_str());
        let progress = match document.percentage {
            Some(pct) => format!("{pct:.0}%"),
            None => "new".to_string(),
        };

        row![
            column![
                text(document.title.as_str()).size(18),
                text(format!("{} · {} words", document.author, document.word_count))
                    .size(14)
                    .color(color(tokens.muted)),
            ]
            .spacing(2),
            horizontal_space(),
            text(progress).color(color(tokens.muted)),
            button(if opening { "Opening..." } else { "Open" })
                .on_press_maybe((!opening).then(|| Message::OpenDocument(document.id.clone()))),
            button("Delete").on_press(Message::DeleteDocument(document.id.clone())),
        ]
        .spacing(12)
        .align_y(Vertical::Center)
        .into()
    }

    fn reading_view<'a>(&'a self, session: &'a ReaderSession) -> Element<'a, Message> {
        let tokens = self.config.theme.tokens();
        let snapshot = session.snapshot();
        let font_size = snapshot.font_size as f32;

        let word = row![
            text(snapshot.before_pivot)
                .font(Font::MONOSPACE)
                .size(font_size)
                .color(color(tokens.foreground)),
            text(snapshot.pivot)
                .font(Font::MONOSPACE)
                .size(font_size)
                .color(color(tokens.fixation)),
            text(snapshot.after_pivot)
                .font(Font::MONOSPACE)
                .size(font_size)
                .color(color(tokens.foreground)),
        ]
        .align_y(Vertical::Center);

        let stage = container(word)
            .center_x(Length::Fill)
            .center_y(Length::Fill);

        let fraction = if snapshot.word_count == 0 {
            0.0
        } else {
            snapshot.index as f64 / snapshot.word_count as f64
        };
        let (fill, track) = (color(tokens.progress_fill), color(tokens.progress_track));
        let progress = slider(0.0..=1.0, fraction, Message::SeekBar)
            .step(0.0005)
            .style(move |_theme, _status| progress_style(fill, track));

        let play_label = if snapshot.is_playing { "Pause" } else { "Play" };
        let controls = row![
            button("<< Skip").on_press(Message::Reader(SessionCommand::SkipBackward)),
            button("< Step").on_press(Message::Reader(SessionCommand::StepBackward)),
            button(play_label).on_press(Message::Reader(SessionCommand::PlayPause)),
            button("Step >").on_press(Message::Reader(SessionCommand::StepForward)),
            button("Skip >>").on_press(Message::Reader(SessionCommand::SkipForward)),
            horizontal_space(),
            button(if self.fullscreen {
                "Windowed"
            } else {
                "Fullscreen"
            })
            .on_press(Message::ToggleFullscreen),
            button(text(format!("Theme: {}", self.config.theme))).on_press(Message::CycleTheme),
            button("Library").on_press(Message::CloseSession),
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let rate = row![
            text(format!("{} wpm", snapshot.wpm)).width(Length::Fixed(90.0)),
            slider(MIN_WPM..=MAX_WPM, snapshot.wpm, |wpm| {
                Message::Reader(SessionCommand::SetRate(wpm))
            })
            .step(10u32),
        ]
        .spacing(10)
        .align_y(Vertical::Center);

        let stats = text(format!(
            "{} · word {} of {} · {:.1}% · {} left · {}",
            snapshot.title,
            snapshot.index + 1,
            snapshot.word_count,
            snapshot.progress_pct,
            snapshot.words_remaining,
            format_remaining(snapshot.seconds_remaining),
        ))
        .size(14)
        .color(color(tokens.muted));

        column![stage, progress, controls, rate, stats]
            .spacing(12)
            .padding(24)
            .height(Length::Fill)
            .into()
    }
}

fn progress_style(fill: Color, track: Color) -> slider::Style {
    slider::Style {
        rail: slider::Rail {
            backgrounds: (fill.into(), track.into()),
            width: 4.0,
            border: Border {
                radius: 2.0.into(),
                ..Border::default()
            },
        },
        handle: slider::Handle {
            shape: slider::HandleShape::Circle { radius: 7.0 },
            background: fill.into(),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        },
    }
}

/// `m:ss` for short reads, `h:mm:ss` past an hour.
fn format_remaining(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.ceil() as u64
    } else {
        0
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
