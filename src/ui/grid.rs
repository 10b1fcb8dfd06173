use std::collections::HashMap;

use iced::widget::{button, column, container, scrollable, text, Column, Row};
use iced::{Alignment, Element, Length};

use super::spinner::spinner;
use super::tile::tile;
use crate::dnd::GridLayout;
use crate::error::FetchError;
use crate::state::data::{ImageId, Thumbnail};
use crate::state::gallery::Gallery;
use crate::Message;

/// Padding around the grid inside the scrollable
pub const GRID_PADDING: f32 = 24.0;

/// Identifies the grid scrollable for scroll operations
pub fn grid_id() -> scrollable::Id {
    scrollable::Id::new("gallery-grid")
}

/// The scrollable grid of tiles, laid out row by row with `layout`
pub fn grid<'a>(
    gallery: &Gallery,
    thumbnails: &HashMap<ImageId, Thumbnail>,
    layout: &GridLayout,
    phase: f32,
) -> Element<'a, Message> {
    let size = layout.tile_size();

    let rows = gallery.items().chunks(layout.columns()).map(|chunk| {
        Element::from(
            Row::with_children(chunk.iter().map(|id| {
                tile(id, thumbnails.get(id), gallery.tile_state(id), size, phase)
            }))
            .spacing(layout.spacing()),
        )
    });

    let content = Column::with_children(rows)
        .spacing(layout.spacing())
        .padding(GRID_PADDING)
        .width(Length::Fill);

    scrollable(content)
        .id(grid_id())
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(Message::Scrolled)
        .into()
}

/// Shown while the listing request is in flight
pub fn loading<'a>(phase: f32) -> Element<'a, Message> {
    centered(
        column![spinner(phase, 48.0), text("Loading images...").size(16)]
            .spacing(16)
            .align_x(Alignment::Center),
    )
}

/// Shown when the gallery is empty after a successful load
pub fn empty<'a>(tile_size: f32) -> Element<'a, Message> {
    centered(
        column![text("No images").size(18), upload(tile_size)]
            .spacing(16)
            .align_x(Alignment::Center),
    )
}

/// Shown when the listing request failed
pub fn failed<'a>(error: &FetchError, tile_size: f32) -> Element<'a, Message> {
    centered(
        column![
            text("Could not load images").size(18),
            text(error.to_string()).size(14),
            button(text("Try Again")).on_press(Message::Reload).padding(10),
            upload(tile_size),
        ]
        .spacing(16)
        .align_x(Alignment::Center),
    )
}

/// Upload affordance: imports images from a local folder
fn upload<'a>(tile_size: f32) -> Element<'a, Message> {
    let label = column![text("Add Images").size(16), text("Import a folder").size(12)]
        .spacing(4)
        .align_x(Alignment::Center);

    button(
        container(label)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    )
    .width(Length::Fixed(tile_size))
    .height(Length::Fixed(tile_size))
    .style(button::secondary)
    .on_press(Message::AddFolder)
    .into()
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
