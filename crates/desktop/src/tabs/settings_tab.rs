use iced::widget::{column, row, slider, text, text_input, Space};
use iced::{Element, Length};

use facelens_core::shared::constants::SYNTHETIC_CAMERA_SCHEME;

use crate::app::{scaled, HoverTarget, Message};
use crate::settings::Settings;
use crate::widgets::action_button::{action_button, ButtonKind};
use crate::workers::health_worker::BackendHealth;

const MAX_TIMEOUT_SECS: u32 = 120;

pub fn view<'a>(
    settings: &Settings,
    health: &BackendHealth,
    hovered: Option<HoverTarget>,
) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let timeout_label = match settings.timeout_secs {
        0 => "No timeout".to_string(),
        secs => format!("{secs} s"),
    };

    column![
        text("Backend").size(scaled(16.0, fs)),
        Space::new().height(8),
        text_input("http://localhost:8000", &settings.backend_url)
            .on_input(Message::BackendUrlChanged)
            .size(scaled(13.0, fs))
            .padding(8),
        Space::new().height(8),
        row![
            text(health.label()).size(scaled(13.0, fs)).width(Length::Fill),
            action_button(
                ButtonKind::Secondary,
                move || text("Check connection").size(scaled(13.0, fs)).into(),
                (*health != BackendHealth::Checking).then_some(Message::CheckHealth),
                hovered == Some(HoverTarget::CheckHealth),
                |h| Message::Hover(HoverTarget::CheckHealth, h),
                [6, 14],
                Length::Shrink,
            ),
            action_button(
                ButtonKind::Secondary,
                move || text("API docs").size(scaled(13.0, fs)).into(),
                Some(Message::OpenApiDocs),
                hovered == Some(HoverTarget::ApiDocs),
                |h| Message::Hover(HoverTarget::ApiDocs, h),
                [6, 14],
                Length::Shrink,
            ),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
        Space::new().height(20),
        text("Request timeout").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            slider(0..=MAX_TIMEOUT_SECS, settings.timeout_secs, Message::TimeoutChanged).step(5u32),
            text(timeout_label).size(scaled(13.0, fs)).width(90),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(20),
        text("Camera").size(scaled(16.0, fs)),
        Space::new().height(8),
        text_input("/dev/video0", &settings.camera_device)
            .on_input(Message::CameraDeviceChanged)
            .size(scaled(13.0, fs))
            .padding(8),
        Space::new().height(4),
        text(format!(
            "Use {SYNTHETIC_CAMERA_SCHEME}NAME for a test pattern instead of a real camera."
        ))
        .size(scaled(12.0, fs)),
        Space::new().height(24),
        action_button(
            ButtonKind::Secondary,
            move || text("Restore Defaults").size(scaled(13.0, fs)).into(),
            Some(Message::RestoreDefaults),
            hovered == Some(HoverTarget::RestoreDefaults),
            |h| Message::Hover(HoverTarget::RestoreDefaults, h),
            [8, 16],
            Length::Shrink,
        ),
    ]
    .spacing(0)
    .into()
}
