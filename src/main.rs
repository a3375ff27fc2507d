use iced::event::{self, Event};
use iced::keyboard::{self, key::Named, Key};
use iced::widget::{button, column, container, image, row, text, text_editor, tooltip, Column};
use iced::{window, Alignment, Border, Color, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod preview;
mod state;

use config::Config;
use state::gallery::NO_IMAGES;
use state::store::IMAGE_EXTENSIONS;
use state::{Capture, CurrentItem, Gallery, GalleryState, Store};

const SAVED: &str = "Image and text saved successfully.";

/// How the status line is colored
#[derive(Debug, Clone, Copy, PartialEq)]
enum Tone {
    Success,
    Failure,
}

/// Main application state
struct CaptionVault {
    /// Images and captions on disk
    store: Store,
    /// Pending image and caption being typed
    capture: Capture,
    /// Multi-line caption editor; its text is mirrored into `capture`
    caption: text_editor::Content,
    /// Gallery cursor; Closed until "Browse Images"
    gallery: Gallery,
    /// What the gallery shows, rebuilt after every gallery change
    current: Option<CurrentItem>,
    /// Thumbnail of the pending image, if it could be decoded
    preview: Option<image::Handle>,
    thumbnail_size: u32,
    /// A file is being dragged over the window
    hovering: bool,
    /// Status message to display to the user
    status: String,
    tone: Tone,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    /// User clicked "Pick Image..."
    PickImage,
    CaptionEdited(text_editor::Action),
    Save,
    BrowseImages,
    CloseGallery,
    Next,
    Previous,
    DeleteCurrent,
}

impl CaptionVault {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        (Self::with_config(Config::load()), Task::none())
    }

    fn with_config(config: Config) -> Self {
        let store = Store::new(config.storage_dir);

        let status = match store.list_items() {
            Ok(items) => {
                info!("🎨 Caption Vault initialized with {} images in {}", items.len(), store.dir().display());
                String::new()
            }
            Err(e) => {
                error!("could not read {}: {}", store.dir().display(), e);
                e.to_string()
            }
        };
        let tone = if status.is_empty() { Tone::Success } else { Tone::Failure };

        CaptionVault {
            store,
            capture: Capture::new(),
            caption: text_editor::Content::new(),
            gallery: Gallery::new(),
            current: None,
            preview: None,
            thumbnail_size: config.thumbnail_size,
            hovering: false,
            status,
            tone,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FileHovered => self.hovering = true,
            Message::FilesHoveredLeft => self.hovering = false,
            Message::FileDropped(path) => {
                self.hovering = false;
                self.accept(path);
            }
            Message::PickImage => {
                let picked = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_file();

                if let Some(path) = picked {
                    self.accept(path);
                }
            }
            Message::CaptionEdited(action) => {
                self.caption.perform(action);
                self.capture.set_caption(caption_text(&self.caption));
            }
            Message::Save => self.save(),
            Message::BrowseImages => match self.gallery.open(&self.store) {
                Ok(()) => self.sync_gallery(),
                Err(e) => self.report(e),
            },
            Message::CloseGallery => {
                self.gallery.close();
                self.sync_gallery();
            }
            Message::Next => {
                self.gallery.next();
                self.sync_gallery();
            }
            Message::Previous => {
                self.gallery.previous();
                self.sync_gallery();
            }
            Message::DeleteCurrent => match self.gallery.delete_current(&self.store) {
                Ok(Some(deleted)) => {
                    if deleted.image_removed {
                        self.set_status(format!("Deleted {}.", deleted.filename), Tone::Success);
                    } else {
                        self.set_status(
                            format!(
                                "Could not remove {} from disk; it will show up again next time.",
                                deleted.filename
                            ),
                            Tone::Failure,
                        );
                    }
                    self.sync_gallery();
                }
                Ok(None) => {}
                Err(e) => self.report(e),
            },
        }

        Task::none()
    }

    /// Take a dropped or picked file as the pending image and build its preview
    fn accept(&mut self, path: PathBuf) {
        if let Err(e) = self.capture.accept_drop(&path) {
            self.report(e);
            return;
        }

        match preview::thumbnail(&path, self.thumbnail_size) {
            Ok(thumb) => {
                self.preview = Some(image::Handle::from_rgba(thumb.width, thumb.height, thumb.pixels));
                self.set_status(String::new(), Tone::Success);
            }
            Err(e) => {
                warn!("no preview for {}: {}", path.display(), e);
                self.preview = None;
                self.set_status("Preview unavailable; the file can still be saved.", Tone::Failure);
            }
        }
    }

    fn save(&mut self) {
        match self.capture.commit(&self.store) {
            Ok(filename) => {
                info!("✅ saved {}", filename);
                self.preview = None;
                self.caption = text_editor::Content::new();
                self.set_status(SAVED, Tone::Success);

                if let Err(e) = self.gallery.refresh(&self.store) {
                    self.report(e);
                }
                self.sync_gallery();
            }
            Err(e) => self.report(e),
        }
    }

    /// Rebuild what the gallery displays from its cursor
    fn sync_gallery(&mut self) {
        match self.gallery.current(&self.store) {
            Ok(current) => self.current = current,
            Err(e) => {
                self.current = None;
                self.report(e);
            }
        }
    }

    fn report(&mut self, e: state::Error) {
        if e.is_invalid_input() {
            info!("{}", e);
        } else {
            error!("⚠️  {}", e);
        }
        self.set_status(e.to_string(), Tone::Failure);
    }

    fn set_status(&mut self, status: impl Into<String>, tone: Tone) {
        self.status = status.into();
        self.tone = tone;
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content: Element<Message> = if self.gallery.is_open() {
            row![self.capture_view(), self.gallery_view()]
                .spacing(40)
                .into()
        } else {
            self.capture_view()
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn capture_view(&self) -> Element<Message> {
        let drop_content: Element<Message> = match (&self.preview, self.capture.pending()) {
            (Some(handle), _) => image(handle.clone()).into(),
            (None, Some(path)) => text(path.display().to_string()).size(14).into(),
            (None, None) => text("Drop Image Here").size(20).into(),
        };

        let hovering = self.hovering;
        let drop_area = container(drop_content)
            .padding(20)
            .center_x(Length::Fixed(400.0))
            .center_y(Length::Fixed(200.0))
            .style(move |theme: &Theme| {
                let palette = theme.extended_palette();
                let background = if hovering {
                    palette.primary.weak.color
                } else {
                    palette.background.weak.color
                };

                container::Style {
                    background: Some(background.into()),
                    border: Border {
                        color: palette.background.strong.color,
                        width: 1.0,
                        radius: 4.0.into(),
                    },
                    ..container::Style::default()
                }
            });

        let status_color = match self.tone {
            Tone::Success => Color::from_rgb(0.3, 0.8, 0.4),
            Tone::Failure => Color::from_rgb(0.9, 0.3, 0.3),
        };

        let content: Column<Message> = column![
            text(&self.status).size(16).color(status_color),
            drop_area,
            text("Enter Text:").size(16),
            container(
                text_editor(&self.caption)
                    .placeholder("Caption")
                    .on_action(Message::CaptionEdited)
                    .height(Length::Fixed(120.0))
                    .padding(10),
            )
            .width(Length::Fixed(400.0)),
            row![
                button("Pick Image...").on_press(Message::PickImage).padding(10),
                button("Save").on_press(Message::Save).padding(10),
                button("Browse Images").on_press(Message::BrowseImages).padding(10),
            ]
            .spacing(10),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Alignment::Center);

        content.into()
    }

    fn gallery_view(&self) -> Element<Message> {
        let body: Column<Message> = match &self.current {
            Some(item) => column![
                image(image::Handle::from_path(&item.image_path))
                    .width(Length::Fixed(480.0))
                    .height(Length::Fixed(360.0)),
                container(text(&item.caption).size(16)).width(Length::Fixed(480.0)),
                text(item.counter()).size(14),
            ],
            None => column![text(NO_IMAGES).size(16)],
        };

        let browsing = matches!(self.gallery.state(), GalleryState::Browsing(_));

        let controls = row![
            tooltip(
                button("<< Back").on_press_maybe(browsing.then_some(Message::Previous)),
                hint("Previous Image (Left Arrow or 'j')"),
                tooltip::Position::Bottom,
            ),
            button("Delete").on_press_maybe(browsing.then_some(Message::DeleteCurrent)),
            button("Close").on_press(Message::CloseGallery),
            tooltip(
                button("Next >>").on_press_maybe(browsing.then_some(Message::Next)),
                hint("Next Image (Right Arrow or 'k')"),
                tooltip::Position::Bottom,
            ),
        ]
        .spacing(10);

        body.push(controls)
            .spacing(20)
            .padding(20)
            .align_x(Alignment::Center)
            .into()
    }

    /// Listen for file drops and gallery navigation keys
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(handle_event)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Caption as typed, without the line ending the editor reports after the
/// last line
fn caption_text(content: &text_editor::Content) -> String {
    let mut text = content.text();
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

fn hint(label: &str) -> Element<Message> {
    container(text(label).size(12))
        .padding(6)
        .style(container::rounded_box)
        .into()
}

fn handle_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
        Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        // keys already used by a focused widget (e.g. the caption input) are not ours
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. })
            if matches!(status, event::Status::Ignored) =>
        {
            navigation_key(&key)
        }
        _ => None,
    }
}

/// Left/j = previous, Right/k = next
fn navigation_key(key: &Key) -> Option<Message> {
    match key.as_ref() {
        Key::Named(Named::ArrowLeft) | Key::Character("j") => Some(Message::Previous),
        Key::Named(Named::ArrowRight) | Key::Character("k") => Some(Message::Next),
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caption_vault=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    iced::application(
        "Image and Text Storage",
        CaptionVault::update,
        CaptionVault::view,
    )
    .subscription(CaptionVault::subscription)
    .theme(CaptionVault::theme)
    .centered()
    .run_with(CaptionVault::new)
}
