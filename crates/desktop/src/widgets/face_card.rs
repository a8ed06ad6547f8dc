use iced::widget::{column, container, text};
use iced::{Color, Element, Theme};

use facelens_core::presentation::result_view::FaceCardView;

use crate::app::scaled;
use crate::theme::{muted_color, surface_color};

const CORNER_RADIUS: f32 = 10.0;
const ACCENT_WIDTH: f32 = 1.5;
pub const CARD_WIDTH: f32 = 190.0;

/// Detail card for one detected face.
pub fn face_card<'a, Message: 'a>(card: &FaceCardView, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let muted = muted_color(theme);
    let surface = surface_color(theme);
    let accent = Color {
        a: 0.35,
        ..theme.palette().primary
    };

    let line = |s: &str| text(s.to_string()).size(scaled(13.0, fs)).color(muted);

    container(
        column![
            text(card.title.clone())
                .size(scaled(14.0, fs))
                .font(iced::Font {
                    weight: iced::font::Weight::Semibold,
                    ..iced::Font::DEFAULT
                }),
            line(&card.confidence),
            line(&card.position),
            line(&card.size),
        ]
        .spacing(3),
    )
    .padding([10, 12])
    .width(CARD_WIDTH)
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            color: accent,
            width: ACCENT_WIDTH,
            radius: CORNER_RADIUS.into(),
        },
        ..container::Style::default()
    })
    .into()
}
