use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use facelens_core::capture::domain::camera::Camera;
use facelens_core::capture::infrastructure::camera_factory::create_camera;
use facelens_core::capture::infrastructure::image_file_source::ImageFileSource;
use facelens_core::presentation::result_view::ResultView;
use facelens_core::session::detection_session::DetectionSession;
use facelens_core::session::download::FileDownloadSink;
use facelens_core::session::pending_detection::{DetectionOutcome, PendingDetection};
use facelens_core::shared::constants::{ANNOTATED_DOWNLOAD_FILENAME, IMAGE_EXTENSIONS};
use facelens_core::shared::data_url::DataUrl;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::tabs::detect_tab::DetectTab;
use crate::theme;
use crate::workers::detection_worker;
use crate::workers::health_worker::{self, BackendHealth};
use crate::workers::webcam_worker::BackgroundCamera;

const API_DOCS_PATH: &str = "/docs";
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The camera for `device`, read off the UI thread.
fn live_camera(device: &str) -> Box<dyn Camera> {
    Box::new(BackgroundCamera::new(create_camera(device)))
}

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Detect,
    Settings,
    Appearance,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Detect, Tab::Settings, Tab::Appearance, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Detect => "Detect",
            Tab::Settings => "Settings",
            Tab::Appearance => "Appearance",
            Tab::About => "About",
        }
    }
}

/// Buttons that animate on hover. Only one can be hovered at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Browse,
    Detect,
    StartWebcam,
    StopWebcam,
    Capture,
    Download,
    OpenSaved,
    CheckHealth,
    ApiDocs,
    RestoreDefaults,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    SelectFile,
    FileSelected(Option<PathBuf>),
    Detect,
    StartWebcam,
    StopWebcam,
    Capture,
    Download,
    DownloadTargetSelected(Option<PathBuf>),
    OpenSaved,
    Tick,
    BackendUrlChanged(String),
    TimeoutChanged(u32),
    CameraDeviceChanged(String),
    RestoreDefaults,
    CheckHealth,
    OpenApiDocs,
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    PollSystemTheme,
    Hover(HoverTarget, bool),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// A decoded image ready for display, keyed by the data URL it came from.
struct CachedImage {
    source: DataUrl,
    handle: image::Handle,
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    theme: Theme,
    session: DetectionSession,
    outcomes_tx: Sender<DetectionOutcome>,
    outcomes_rx: Receiver<DetectionOutcome>,
    in_flight: usize,
    health: BackendHealth,
    health_rx: Option<Receiver<BackendHealth>>,
    preview_image: Option<CachedImage>,
    annotated_image: Option<CachedImage>,
    live_image: Option<image::Handle>,
    last_saved: Option<PathBuf>,
    hovered: Option<HoverTarget>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let (outcomes_tx, outcomes_rx) = crossbeam_channel::unbounded();
        let mut app = Self {
            active_tab: Tab::Detect,
            theme: theme::resolve_theme(settings.appearance, settings.high_contrast),
            session: DetectionSession::new(live_camera(&settings.camera_device)),
            settings,
            outcomes_tx,
            outcomes_rx,
            in_flight: 0,
            health: BackendHealth::Unknown,
            health_rx: None,
            preview_image: None,
            annotated_image: None,
            live_image: None,
            last_saved: None,
            hovered: None,
        };
        app.check_health();
        (app, Task::none())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::SelectFile => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select an image")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::FileSelected,
                );
            }
            Message::FileSelected(Some(path)) => {
                match ImageFileSource::read(&path) {
                    Ok(file) => self.session.select_file(file),
                    Err(e) => self.session.reject_file(&e),
                }
                self.sync_images();
            }
            Message::FileSelected(None) => {}
            Message::Detect => {
                if let Some(pending) = self.session.submit_selected_image() {
                    self.dispatch(pending);
                }
            }
            Message::StartWebcam => {
                self.session.start_webcam();
            }
            Message::StopWebcam => {
                self.session.stop_webcam();
                self.live_image = None;
            }
            Message::Capture => {
                if let Some(pending) = self.session.capture_and_submit() {
                    self.dispatch(pending);
                }
            }
            Message::Download => {
                let start_dir = dirs::download_dir();
                return Task::perform(
                    async move {
                        let mut dialog = rfd::AsyncFileDialog::new()
                            .set_title("Save annotated image")
                            .set_file_name(ANNOTATED_DOWNLOAD_FILENAME)
                            .add_filter("JPEG image", &["jpg", "jpeg"]);
                        if let Some(dir) = start_dir {
                            dialog = dialog.set_directory(dir);
                        }
                        dialog.save_file().await.map(|h| h.path().to_path_buf())
                    },
                    Message::DownloadTargetSelected,
                );
            }
            Message::DownloadTargetSelected(Some(path)) => {
                self.last_saved = self
                    .session
                    .download_annotated_result(&FileDownloadSink::new(path));
            }
            Message::DownloadTargetSelected(None) => {}
            Message::OpenSaved => {
                if let Some(path) = &self.last_saved {
                    if let Err(e) = open::that(path) {
                        log::warn!("Could not open {}: {e}", path.display());
                    }
                }
            }
            Message::Tick => {
                self.poll_workers();
                self.refresh_live_image();
            }
            Message::BackendUrlChanged(url) => {
                self.settings.backend_url = url;
                self.settings.save();
                self.health = BackendHealth::Unknown;
            }
            Message::TimeoutChanged(secs) => {
                self.settings.timeout_secs = secs;
                self.settings.save();
            }
            Message::CameraDeviceChanged(device) => {
                self.settings.camera_device = device;
                self.settings.save();
                self.replace_camera();
            }
            Message::RestoreDefaults => {
                self.settings.restore_connection_defaults();
                self.settings.save();
                self.replace_camera();
                self.health = BackendHealth::Unknown;
            }
            Message::CheckHealth => {
                self.check_health();
            }
            Message::OpenApiDocs => {
                let url = self.settings.backend_config().endpoint(API_DOCS_PATH);
                if let Err(e) = open::that(&url) {
                    log::warn!("Could not open {url}: {e}");
                }
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
                self.refresh_theme();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
                self.refresh_theme();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollSystemTheme => {
                self.refresh_theme();
            }
            Message::Hover(target, true) => {
                self.hovered = Some(target);
            }
            Message::Hover(target, false) => {
                if self.hovered == Some(target) {
                    self.hovered = None;
                }
            }
        }
        Task::none()
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
            Tab::Detect => tabs::detect_tab::view(
                &DetectTab {
                    view: ResultView::project(&self.session),
                    selected_label: self.session.selected().map(|s| s.label()),
                    preview: self.preview_image.as_ref().map(|c| &c.handle),
                    annotated: self.annotated_image.as_ref().map(|c| &c.handle),
                    live: self.live_image.as_ref(),
                    last_saved: self.last_saved.as_deref(),
                    hovered: self.hovered,
                    fs,
                },
                &self.theme,
            ),
            Tab::Settings => tabs::settings_tab::view(&self.settings, &self.health, self.hovered),
            Tab::Appearance => tabs::appearance_tab::view(&self.settings, &self.theme),
            Tab::About => tabs::about_tab::view(fs),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        // Footer
        let footer = container(
            row![
                text(self.health.label()).size(scaled(11.0, fs)),
                button(text("Check").size(scaled(11.0, fs)))
                    .on_press_maybe(
                        (self.health != BackendHealth::Checking).then_some(Message::CheckHealth)
                    )
                    .style(button::text),
            ]
            .spacing(6)
            .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding([4, 0]);

        column![tab_bar, tab_content, footer]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let tick = if self.session.webcam().is_active() {
            iced::time::every(FRAME_INTERVAL).map(|_| Message::Tick)
        } else if self.in_flight > 0 || self.health_rx.is_some() {
            iced::time::every(WORKER_POLL_INTERVAL).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let theme_poll = if self.settings.appearance == Appearance::System {
            iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme)
        } else {
            Subscription::none()
        };

        Subscription::batch([tick, theme_poll])
    }

    fn dispatch(&mut self, pending: PendingDetection) {
        detection_worker::spawn(
            pending,
            self.settings.backend_config(),
            self.outcomes_tx.clone(),
        );
        self.in_flight += 1;
    }

    fn poll_workers(&mut self) {
        let mut applied = false;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            applied |= self.session.complete(outcome);
        }
        if applied {
            self.sync_images();
        }

        if let Some(rx) = &self.health_rx {
            match rx.try_recv() {
                Ok(health) => {
                    self.health = health;
                    self.health_rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.health = BackendHealth::Unhealthy("health check aborted".into());
                    self.health_rx = None;
                }
            }
        }
    }

    fn refresh_live_image(&mut self) {
        if !self.session.webcam().is_active() {
            return;
        }
        self.live_image = self
            .session
            .refresh_webcam_sink()
            .map(|frame| image::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba()));
    }

    fn check_health(&mut self) {
        self.health = BackendHealth::Checking;
        self.health_rx = Some(health_worker::spawn(self.settings.backend_config()));
    }

    fn replace_camera(&mut self) {
        self.session
            .set_camera(live_camera(&self.settings.camera_device));
        self.live_image = None;
    }

    fn refresh_theme(&mut self) {
        self.theme = theme::resolve_theme(self.settings.appearance, self.settings.high_contrast);
    }

    /// Re-decodes the preview and annotated images when their data URLs change.
    fn sync_images(&mut self) {
        sync_cached(&mut self.preview_image, self.session.preview());
        sync_cached(
            &mut self.annotated_image,
            self.session
                .result()
                .and_then(|r| r.annotated_image.as_ref()),
        );
    }
}

fn sync_cached(slot: &mut Option<CachedImage>, source: Option<&DataUrl>) {
    let Some(url) = source else {
        *slot = None;
        return;
    };
    if slot.as_ref().is_some_and(|cached| &cached.source == url) {
        return;
    }
    *slot = match url.decode() {
        Ok(bytes) => Some(CachedImage {
            source: url.clone(),
            handle: image::Handle::from_bytes(bytes),
        }),
        Err(e) => {
            log::warn!("Could not decode {} image for display: {e}", url.mime_type());
            None
        }
    };
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}
