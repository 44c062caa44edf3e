use std::path::{Path, PathBuf};
use std::time::Duration;

use iced::widget::{button, column, container, image, row, text};
use iced::{event, keyboard, window, Element, Event, Length, Subscription, Task, Theme};

use pdfblur_core::editing::display_transform::DisplayTransform;
use pdfblur_core::session::redaction_session::RedactionSession;
use pdfblur_core::shared::constants::PDF_EXTENSION;
use pdfblur_core::shared::geometry::Point;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Editor,
    Settings,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Editor, Tab::Settings, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Editor => "Editor",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    OpenPdf,
    PdfPicked(Option<PathBuf>),
    FileHovered,
    FileDropped(PathBuf),
    SavePdf,
    SavePathPicked(Option<PathBuf>),
    OpenExported,
    PreviousPage,
    NextPage,
    SelectionStarted(Point),
    SelectionMoved(Point),
    SelectionEnded(Point, DisplayTransform),
    DialogDismissed,
    BlurRadiusChanged(f32),
    DpiChanged(u32),
    RestoreDefaults,
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    PollSystemTheme,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    session: RedactionSession,
    /// Texture of the current page. Rebuilt after every change to the page.
    preview: Option<image::Handle>,
    status: String,
    last_export: Option<PathBuf>,
    drops: DropFilter,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let session = RedactionSession::with_defaults(settings.blur_radius, settings.dpi)
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default blur settings: {e}");
                RedactionSession::default()
            });
        (
            Self {
                active_tab: Tab::Editor,
                settings,
                session,
                preview: None,
                status: String::from("Open a PDF to get started"),
                last_export: None,
                drops: DropFilter::default(),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        // Drops of several files arrive back to back; anything else ends the run.
        if !matches!(message, Message::FileDropped(_)) {
            self.drops.reset();
        }

        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::OpenPdf => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Open PDF")
                            .add_filter("PDF Files", &[PDF_EXTENSION])
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::PdfPicked,
                );
            }
            Message::PdfPicked(Some(path)) => return self.load(&path),
            Message::PdfPicked(None) => {}
            Message::FileHovered => {}
            Message::FileDropped(path) => {
                if self.drops.accept(&path) {
                    self.active_tab = Tab::Editor;
                    return self.load(&path);
                }
                log::debug!("Ignoring dropped file {}", path.display());
            }
            Message::SavePdf => {
                let Some(source) = self.session.source_path() else {
                    return Task::none();
                };
                let default_path = default_export_path(source);
                let start_dir = default_path.parent().map(Path::to_path_buf);
                let start_name = default_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string());
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Save blurred PDF as")
                            .add_filter("PDF Files", &[PDF_EXTENSION]);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        if let Some(name) = start_name {
                            dialog = dialog.set_file_name(name);
                        }
                        dialog.save_file().await.map(|h| h.path().to_path_buf())
                    },
                    Message::SavePathPicked,
                );
            }
            Message::SavePathPicked(Some(path)) => return self.export(path),
            Message::SavePathPicked(None) => {}
            Message::OpenExported => {
                if let Some(path) = &self.last_export {
                    if let Err(e) = open::that(path) {
                        log::warn!("Could not open {}: {e}", path.display());
                    }
                }
            }
            Message::PreviousPage => {
                if self.session.previous_page() {
                    self.refresh_preview();
                }
            }
            Message::NextPage => {
                if self.session.next_page() {
                    self.refresh_preview();
                }
            }
            Message::SelectionStarted(point) => {
                self.session.begin_selection(point);
            }
            Message::SelectionMoved(point) => {
                self.session.update_selection(point);
            }
            Message::SelectionEnded(point, transform) => {
                match self.session.commit_selection(point, &transform) {
                    Ok(Some(region)) => {
                        self.refresh_preview();
                        self.status = format!(
                            "Blurred {}\u{00D7}{} px on page {}",
                            region.width,
                            region.height,
                            self.session.current_index() + 1
                        );
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Blur failed: {e}");
                        self.status = format!("Blur failed: {e}");
                    }
                }
            }
            Message::DialogDismissed => {}
            Message::BlurRadiusChanged(radius) => {
                self.settings.blur_radius = radius;
                if let Err(e) = self.session.set_blur_radius(radius) {
                    log::warn!("Rejected blur radius: {e}");
                }
                self.settings.save();
            }
            Message::DpiChanged(dpi) => {
                self.settings.dpi = dpi;
                self.session.set_dpi(dpi);
                self.settings.save();
            }
            Message::RestoreDefaults => {
                let defaults = Settings::default();
                self.settings.blur_radius = defaults.blur_radius;
                self.settings.dpi = defaults.dpi;
                if let Err(e) = self.session.set_blur_radius(defaults.blur_radius) {
                    log::warn!("Rejected blur radius: {e}");
                }
                self.session.set_dpi(defaults.dpi);
                self.settings.save();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    fn load(&mut self, path: &Path) -> Task<Message> {
        match self.session.open(path) {
            Ok(count) => {
                self.refresh_preview();
                self.last_export = None;
                self.status = format!("Loaded {} ({count} pages)", file_name(path));
                Task::none()
            }
            Err(e) => {
                log::error!("Load failed: {e}");
                show_dialog(rfd::MessageLevel::Error, "Could not open PDF", e.to_string())
            }
        }
    }

    fn export(&mut self, path: PathBuf) -> Task<Message> {
        match self.session.export(&path) {
            Ok(()) => {
                self.status = format!(
                    "Saved {} pages to {}",
                    self.session.page_count(),
                    file_name(&path)
                );
                let notice = path.display().to_string();
                self.last_export = Some(path);
                show_dialog(rfd::MessageLevel::Info, "PDF Saved Successfully!", notice)
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                show_dialog(rfd::MessageLevel::Error, "Could not save PDF", e.to_string())
            }
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = self
            .session
            .current_page()
            .map(|page| image::Handle::from_rgba(page.width(), page.height(), page.to_rgba()));
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;

        // Tab bar
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        // Tab content
        let content: Element<'_, Message> = match self.active_tab {
            Tab::Editor => tabs::editor_tab::view(
                fs,
                &self.session,
                self.preview.as_ref(),
                &self.status,
                self.last_export.is_some(),
                &self.theme(),
            ),
            Tab::Settings => tabs::settings_tab::view(&self.settings),
            Tab::About => tabs::about_tab::view(fs),
        };

        let tab_content = container(content)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let window_events = event::listen_with(handle_event);
        if self.settings.appearance == Appearance::System {
            Subscription::batch([
                window_events,
                iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme),
            ])
        } else {
            window_events
        }
    }
}

/// File drops anywhere on the window, plus arrow-key paging when no widget
/// consumed the key.
fn handle_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. })
            if status == event::Status::Ignored =>
        {
            match key {
                keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                    Some(Message::PreviousPage)
                }
                keyboard::Key::Named(keyboard::key::Named::ArrowRight) => Some(Message::NextPage),
                _ => None,
            }
        }
        _ => None,
    }
}

fn show_dialog(
    level: rfd::MessageLevel,
    title: &'static str,
    description: String,
) -> Task<Message> {
    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(description)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::DialogDismissed,
    )
}

/// Takes the first PDF out of a run of consecutive file drops.
#[derive(Debug, Default)]
struct DropFilter {
    taken: bool,
}

impl DropFilter {
    fn accept(&mut self, path: &Path) -> bool {
        if self.taken || !is_pdf(path) {
            return false;
        }
        self.taken = true;
        true
    }

    fn reset(&mut self) {
        self.taken = false;
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

/// `{stem}_blurred.pdf` next to the source document.
pub fn default_export_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    source.with_file_name(format!("{stem}_blurred.{PDF_EXTENSION}"))
}

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PDF_EXTENSION))
}

pub fn page_label(index: usize, count: usize) -> String {
    if count == 0 {
        String::from("Page: - / -")
    } else {
        format!("Page: {} / {count}", index + 1)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
