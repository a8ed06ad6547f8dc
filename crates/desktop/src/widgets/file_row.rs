use iced::widget::{column, container, row, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::{border_color, surface_color, tertiary_color};
use crate::widgets::action_button::{action_button, ButtonKind};

const CORNER_RADIUS: f32 = 12.0;

/// Labelled row showing the current image with a button to pick another.
pub fn file_row<'a>(
    fs: f32,
    label: &str,
    current: Option<&str>,
    on_browse: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let border = border_color(theme);

    let display_text: Element<'a, Message> = match current {
        Some(name) => text(name.to_string())
            .size(scaled(16.0, fs))
            .font(iced::Font {
                weight: iced::font::Weight::Medium,
                ..iced::Font::DEFAULT
            })
            .into(),
        None => text("No image selected")
            .size(scaled(16.0, fs))
            .color(tertiary)
            .into(),
    };

    let btn_label = if current.is_some() { "Change" } else { "Choose\u{2026}" };
    let btn = action_button(
        ButtonKind::Secondary,
        move || text(btn_label).size(scaled(14.0, fs)).into(),
        on_browse,
        hovered,
        on_hover,
        [6, 14],
        Length::Shrink,
    );

    let label_text = text(label.to_uppercase())
        .size(scaled(12.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        })
        .color(tertiary);

    let info = column![label_text, Space::new().height(2), display_text].width(Length::Fill);

    container(row![info, btn].spacing(8).align_y(iced::Alignment::Center))
        .padding([14, 16])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            border: iced::border::Border {
                color: border,
                width: 1.0,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}
