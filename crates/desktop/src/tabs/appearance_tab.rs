use iced::widget::{checkbox, column, pick_list, row, slider, text, Space};
use iced::{Element, Theme};

use facelens_core::presentation::result_view::FaceCardView;
use facelens_core::shared::face::{BoundingBox, Face};

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings};
use crate::widgets::face_card::face_card;

pub fn view<'a>(settings: &Settings, theme: &Theme) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let sample = FaceCardView::new(0, &Face::new(BoundingBox::new(120.0, 80.0, 64.0, 64.0), 0.857));

    column![
        text("Theme").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(settings.appearance), Message::AppearanceChanged)
                .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(12),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Font size").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            slider(0.8..=1.5, settings.font_scale, Message::FontScaleChanged).step(0.05),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(20),
        text("Preview").size(scaled(16.0, fs)),
        Space::new().height(8),
        face_card(&sample, fs, theme),
    ]
    .spacing(0)
    .into()
}
