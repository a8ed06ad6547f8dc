use iced::widget::{column, container, image, text, Space};
use iced::{ContentFit, Element, Length, Theme};

use crate::app::scaled;
use crate::theme::{border_color, surface_color, tertiary_color};

const CORNER_RADIUS: f32 = 12.0;
const IMAGE_HEIGHT: f32 = 260.0;

/// A titled, bordered image; shows `placeholder` when there is no image.
pub fn image_pane<'a, Message: 'a>(
    title: &str,
    handle: Option<&image::Handle>,
    placeholder: &str,
    fs: f32,
    theme: &Theme,
) -> Element<'a, Message> {
    let surface = surface_color(theme);
    let border = border_color(theme);

    let body: Element<'a, Message> = match handle {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(IMAGE_HEIGHT)
            .into(),
        None => container(
            text(placeholder.to_string())
                .size(scaled(13.0, fs))
                .color(tertiary_color(theme)),
        )
        .width(Length::Fill)
        .height(IMAGE_HEIGHT)
        .center_x(Length::Fill)
        .center_y(IMAGE_HEIGHT)
        .into(),
    };

    container(
        column![
            text(title.to_string()).size(scaled(15.0, fs)),
            Space::new().height(8),
            body,
        ]
        .width(Length::Fill),
    )
    .padding(12)
    .width(Length::Fill)
    .style(move |_theme: &Theme| container::Style {
        background: Some(surface.into()),
        border: iced::border::Border {
            color: border,
            width: 1.0,
            radius: CORNER_RADIUS.into(),
        },
        ..container::Style::default()
    })
    .into()
}
