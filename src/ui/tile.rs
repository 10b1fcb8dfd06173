use iced::widget::{checkbox, container, image, text, Space, Stack};
use iced::{Border, Color, ContentFit, Element, Length, Padding, Shadow, Theme, Vector};

use super::spinner::spinner;
use crate::state::data::{ImageId, Thumbnail, TileState};
use crate::Message;

const SPINNER_SIZE: f32 = 32.0;
const RADIUS: f32 = 8.0;

/// A grid tile: thumbnail, selection tint and checkbox.
///
/// The source tile of a drag renders as an empty outlined slot.
pub fn tile<'a>(
    id: &ImageId,
    thumbnail: Option<&Thumbnail>,
    state: TileState,
    size: f32,
    phase: f32,
) -> Element<'a, Message> {
    if state.dragging {
        return container(Space::new(Length::Fill, Length::Fill))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .style(placeholder_style)
            .into();
    }

    let id = id.clone();
    let check = container(
        checkbox("", state.checked).on_toggle(move |_| Message::ToggleSelection(id.clone())),
    )
    .padding(8);

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(picture(thumbnail, phase));
    if state.checked {
        layers =
            layers.push(container(Space::new(Length::Fill, Length::Fill)).style(selected_style));
    }
    layers = layers.push(check);

    container(layers)
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .clip(true)
        .style(tile_style)
        .into()
}

/// Copy of a tile following the pointer during a drag
pub fn floating<'a>(
    thumbnail: Option<&Thumbnail>,
    size: f32,
    phase: f32,
    offset: Padding,
) -> Element<'a, Message> {
    let lifted = container(picture(thumbnail, phase))
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .clip(true)
        .style(floating_style);

    container(lifted)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(offset)
        .into()
}

fn picture<'a>(thumbnail: Option<&Thumbnail>, phase: f32) -> Element<'a, Message> {
    match thumbnail {
        Some(Thumbnail::Ready(handle)) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Cover)
            .into(),
        Some(Thumbnail::Failed) => container(text("Unavailable").size(14))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        Some(Thumbnail::Loading) | None => container(spinner(phase, SPINNER_SIZE))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    }
}

fn tile_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: RADIUS.into(),
        },
        ..container::Style::default()
    }
}

fn selected_style(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::from_rgba(1.0, 1.0, 1.0, 0.56).into()),
        ..container::Style::default()
    }
}

fn placeholder_style(theme: &Theme) -> container::Style {
    container::Style {
        border: Border {
            color: theme.extended_palette().background.strong.color,
            width: 2.0,
            radius: RADIUS.into(),
        },
        ..container::Style::default()
    }
}

fn floating_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(palette.background.weak.color.into()),
        border: Border {
            color: palette.primary.strong.color,
            width: 2.0,
            radius: RADIUS.into(),
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.4),
            offset: Vector::new(0.0, 6.0),
            blur_radius: 16.0,
        },
        ..container::Style::default()
    }
}
