use std::time::Duration;

use iced::border::Border;
use iced::widget::{button, container, mouse_area};
use iced::{Color, Element, Length, Padding, Shadow, Theme, Vector};
use iced_anim::transition::Easing;
use iced_anim::AnimationBuilder;

use crate::theme::{border_color, lerp_color, muted_color, surface_alt_color, surface_color, tertiary_color};

const HOVER_DARKEN: f32 = 0.05;
const FLOAT_HEIGHT: f32 = 1.0;
const CORNER_RADIUS: f32 = 10.0;
const SHADOW_BLUR_BASE: f32 = 10.0;
const SHADOW_BLUR_HOVER: f32 = 15.0;
const SHADOW_OFFSET_Y: f32 = 3.0;
const SHADOW_ALPHA_BASE: f32 = 0.25;
const SHADOW_ALPHA_HOVER: f32 = 0.35;
const DISABLED_ALPHA: f32 = 0.45;
const ANIMATION_DURATION: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Filled with the accent color; the main action of a section.
    Primary,
    /// Outlined surface button.
    Secondary,
}

/// Animated button that lifts on hover. `on_press: None` renders it disabled.
pub fn action_button<'a, Message: Clone + 'a>(
    kind: ButtonKind,
    content: impl Fn() -> Element<'a, Message> + 'a,
    on_press: Option<Message>,
    hovered: bool,
    on_hover: impl Fn(bool) -> Message + 'a,
    padding: [u16; 2],
    width: Length,
) -> Element<'a, Message> {
    let enabled = on_press.is_some();
    let target = if hovered && enabled { 1.0_f32 } else { 0.0 };

    let animated: Element<'a, Message> = AnimationBuilder::new(target, move |t: f32| {
        let t = t.clamp(0.0, 1.0);
        build_button(kind, &content, on_press.clone(), padding, width, t)
    })
    .animates_layout(true)
    .animation(Easing::EASE_OUT.with_duration(ANIMATION_DURATION))
    .into();

    mouse_area(animated)
        .on_enter(on_hover(true))
        .on_exit(on_hover(false))
        .into()
}

fn build_button<'a, Message: Clone + 'a>(
    kind: ButtonKind,
    content: &dyn Fn() -> Element<'a, Message>,
    on_press: Option<Message>,
    padding: [u16; 2],
    width: Length,
    hover_amount: f32,
) -> Element<'a, Message> {
    let btn = button(content())
        .on_press_maybe(on_press)
        .padding(padding)
        .width(width)
        .style(move |theme: &Theme, status: button::Status| {
            let amount = match status {
                button::Status::Pressed => 1.0,
                button::Status::Disabled => 0.0,
                _ => hover_amount,
            };
            let style = match kind {
                ButtonKind::Primary => primary_style(theme, amount),
                ButtonKind::Secondary => secondary_style(theme, amount),
            };
            if status == button::Status::Disabled {
                faded(style)
            } else {
                style
            }
        });

    match kind {
        ButtonKind::Primary => {
            let rise = hover_amount * FLOAT_HEIGHT;
            container(btn)
                .padding(Padding {
                    top: FLOAT_HEIGHT - rise,
                    bottom: rise,
                    ..Padding::ZERO
                })
                .into()
        }
        ButtonKind::Secondary => btn.into(),
    }
}

fn primary_style(theme: &Theme, t: f32) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    button::Style {
        background: Some(darken(base, t).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color {
                a: lerp(SHADOW_ALPHA_BASE, SHADOW_ALPHA_HOVER, t),
                ..base
            },
            offset: Vector::new(0.0, SHADOW_OFFSET_Y),
            blur_radius: lerp(SHADOW_BLUR_BASE, SHADOW_BLUR_HOVER, t),
        },
        ..button::Style::default()
    }
}

fn secondary_style(theme: &Theme, t: f32) -> button::Style {
    button::Style {
        background: Some(lerp_color(surface_color(theme), surface_alt_color(theme), t).into()),
        text_color: muted_color(theme),
        border: Border {
            color: lerp_color(border_color(theme), tertiary_color(theme), t),
            width: 1.0,
            radius: CORNER_RADIUS.into(),
        },
        ..button::Style::default()
    }
}

fn faded(style: button::Style) -> button::Style {
    button::Style {
        background: style.background.map(|bg| bg.scale_alpha(DISABLED_ALPHA)),
        text_color: style.text_color.scale_alpha(DISABLED_ALPHA),
        shadow: Shadow::default(),
        ..style
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn darken(color: Color, amount: f32) -> Color {
    let shift = HOVER_DARKEN * amount;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: 1.0,
    }
}
