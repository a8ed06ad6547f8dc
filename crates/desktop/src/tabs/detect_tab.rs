use std::path::Path;

use iced::border::Border;
use iced::widget::{column, container, image, row, text, Space};
use iced::{Color, Element, Length, Theme};

use facelens_core::presentation::result_view::{ResultView, ResultsPanel};

use crate::app::{scaled, HoverTarget, Message};
use crate::theme::{muted_color, tertiary_color};
use crate::widgets::action_button::{action_button, ButtonKind};
use crate::widgets::face_card::face_card;
use crate::widgets::file_row::file_row;
use crate::widgets::image_pane::image_pane;

const LIVE_HEIGHT: f32 = 300.0;

/// Everything the Detect tab draws, borrowed from the app for one frame.
pub struct DetectTab<'a> {
    pub view: ResultView<'a>,
    pub selected_label: Option<&'a str>,
    pub preview: Option<&'a image::Handle>,
    pub annotated: Option<&'a image::Handle>,
    pub live: Option<&'a image::Handle>,
    pub last_saved: Option<&'a Path>,
    pub hovered: Option<HoverTarget>,
    pub fs: f32,
}

impl DetectTab<'_> {
    fn is_hovered(&self, target: HoverTarget) -> bool {
        self.hovered == Some(target)
    }
}

pub fn view<'a>(tab: &DetectTab<'_>, theme: &Theme) -> Element<'a, Message> {
    let mut col = column![upload_section(tab, theme)].spacing(20);

    col = col.push(webcam_section(tab, theme));

    if let Some(error) = tab.view.error {
        col = col.push(error_banner(error, tab.fs, theme));
    }

    match &tab.view.results {
        Some(panel) => col = col.push(results_section(tab, panel, theme)),
        None => {
            if tab.preview.is_some() {
                col = col.push(image_pane("Preview", tab.preview, "", tab.fs, theme));
            }
        }
    }

    col.into()
}

fn heading<'a>(label: &str, fs: f32) -> Element<'a, Message> {
    text(label.to_string())
        .size(scaled(17.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        })
        .into()
}

fn upload_section<'a>(tab: &DetectTab<'_>, theme: &Theme) -> Element<'a, Message> {
    let fs = tab.fs;
    let loading = tab.view.loading;
    let detect_label = if loading { "Detecting\u{2026}" } else { "Detect Faces" };

    column![
        heading("Upload Image", fs),
        Space::new().height(10),
        file_row(
            fs,
            "Image",
            tab.selected_label,
            Some(Message::SelectFile),
            tab.is_hovered(HoverTarget::Browse),
            |h| Message::Hover(HoverTarget::Browse, h),
            theme,
        ),
        Space::new().height(12),
        action_button(
            ButtonKind::Primary,
            move || text(detect_label).size(scaled(15.0, fs)).color(Color::WHITE).into(),
            tab.view.can_detect.then_some(Message::Detect),
            tab.is_hovered(HoverTarget::Detect),
            |h| Message::Hover(HoverTarget::Detect, h),
            [14, 24],
            Length::Fill,
        ),
    ]
    .into()
}

fn webcam_section<'a>(tab: &DetectTab<'_>, theme: &Theme) -> Element<'a, Message> {
    let fs = tab.fs;
    let mut col = column![heading("Or Use Webcam", fs), Space::new().height(10)];

    if !tab.view.webcam_active {
        col = col.push(action_button(
            ButtonKind::Secondary,
            move || text("\u{1F4F7} Start Webcam").size(scaled(14.0, fs)).into(),
            Some(Message::StartWebcam),
            tab.is_hovered(HoverTarget::StartWebcam),
            |h| Message::Hover(HoverTarget::StartWebcam, h),
            [12, 20],
            Length::Fill,
        ));
        return col.into();
    }

    let capture_label = if tab.view.loading {
        "Detecting\u{2026}"
    } else {
        "Capture & Detect"
    };
    col = col.push(
        row![
            action_button(
                ButtonKind::Primary,
                move || text(capture_label).size(scaled(15.0, fs)).color(Color::WHITE).into(),
                tab.view.can_capture.then_some(Message::Capture),
                tab.is_hovered(HoverTarget::Capture),
                |h| Message::Hover(HoverTarget::Capture, h),
                [12, 24],
                Length::Fill,
            ),
            action_button(
                ButtonKind::Secondary,
                move || text("Stop Webcam").size(scaled(14.0, fs)).into(),
                Some(Message::StopWebcam),
                tab.is_hovered(HoverTarget::StopWebcam),
                |h| Message::Hover(HoverTarget::StopWebcam, h),
                [12, 20],
                Length::Shrink,
            ),
        ]
        .spacing(10),
    );
    col = col.push(Space::new().height(10));

    let live: Element<'a, Message> = match tab.live {
        Some(handle) => image(handle.clone())
            .content_fit(iced::ContentFit::Contain)
            .width(Length::Fill)
            .height(LIVE_HEIGHT)
            .into(),
        None => container(
            text("Waiting for camera\u{2026}")
                .size(scaled(13.0, fs))
                .color(tertiary_color(theme)),
        )
        .width(Length::Fill)
        .height(LIVE_HEIGHT)
        .center_x(Length::Fill)
        .center_y(LIVE_HEIGHT)
        .into(),
    };
    col.push(live).into()
}

fn error_banner<'a>(message: &str, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let danger = theme.palette().danger;
    container(text(message.to_string()).size(scaled(14.0, fs)).color(danger))
        .padding([12, 16])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Color { a: 0.10, ..danger }.into()),
            border: Border {
                color: Color { a: 0.40, ..danger },
                width: 1.0,
                radius: 10.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn results_section<'a>(
    tab: &DetectTab<'_>,
    panel: &ResultsPanel<'_>,
    theme: &Theme,
) -> Element<'a, Message> {
    let fs = tab.fs;
    let muted = muted_color(theme);

    let mut summary = row![text(panel.summary.clone())
        .size(scaled(14.0, fs))
        .color(theme.palette().success)]
    .spacing(8);
    if panel.stale {
        summary = summary.push(
            text("(previous result)")
                .size(scaled(13.0, fs))
                .color(tertiary_color(theme)),
        );
    }

    let mut col = column![
        row![heading("Detection Results", fs), Space::new().width(Length::Fill), summary]
            .align_y(iced::Alignment::Center),
        Space::new().height(12),
        row![
            image_pane("Original Image", tab.preview, "No preview", fs, theme),
            image_pane(
                "Detected Faces",
                tab.annotated,
                "No annotated image returned",
                fs,
                theme
            ),
        ]
        .spacing(12),
    ];

    if panel.can_download {
        let mut actions = row![action_button(
            ButtonKind::Secondary,
            move || text("\u{2B07} Download Result").size(scaled(13.0, fs)).into(),
            Some(Message::Download),
            tab.is_hovered(HoverTarget::Download),
            |h| Message::Hover(HoverTarget::Download, h),
            [8, 16],
            Length::Shrink,
        )]
        .spacing(10)
        .align_y(iced::Alignment::Center);

        if let Some(path) = tab.last_saved {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            actions = actions
                .push(text(format!("Saved as {name}")).size(scaled(13.0, fs)).color(muted))
                .push(action_button(
                    ButtonKind::Secondary,
                    move || text("Open").size(scaled(13.0, fs)).into(),
                    Some(Message::OpenSaved),
                    tab.is_hovered(HoverTarget::OpenSaved),
                    |h| Message::Hover(HoverTarget::OpenSaved, h),
                    [8, 14],
                    Length::Shrink,
                ));
        }
        col = col.push(Space::new().height(10)).push(actions);
    }

    if !panel.faces.is_empty() {
        let cards: Vec<Element<'a, Message>> = panel
            .faces
            .iter()
            .map(|card| face_card(card, fs, theme))
            .collect();
        col = col
            .push(Space::new().height(16))
            .push(heading("Face Details", fs))
            .push(Space::new().height(8))
            .push(row(cards).spacing(10).wrap().vertical_spacing(10));
    }

    col.into()
}
