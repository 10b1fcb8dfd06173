use iced::widget::{button, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Theme};

use crate::Message;

/// Fixed height of the header bar; the grid starts right below it
pub const HEADER_HEIGHT: f32 = 64.0;

/// What the header needs to know about the gallery
#[derive(Debug, Clone, Copy)]
pub struct HeaderInfo<'a> {
    pub selected: usize,
    pub total: usize,
    pub all_selected: bool,
    pub loading: bool,
    pub status: Option<&'a str>,
}

pub fn header<'a>(info: HeaderInfo<'a>) -> Element<'a, Message> {
    let title = match info.selected {
        0 => "Gallery".to_string(),
        1 => "1 File Selected".to_string(),
        n => format!("{n} Files Selected"),
    };

    let mut heading = column![text(title).size(22)].spacing(2);
    if let Some(status) = info.status {
        heading = heading.push(text(status).size(12));
    }

    let select_label = if info.all_selected {
        "Clear Selection"
    } else {
        "Select All"
    };
    let select_all = button(text(select_label))
        .style(button::secondary)
        .on_press_maybe((info.total > 0).then_some(Message::ToggleSelectAll));

    let delete = button(text(if info.selected == 1 {
        "Delete File"
    } else {
        "Delete Files"
    }))
    .style(button::danger)
    .on_press_maybe((info.selected > 0).then_some(Message::DeleteSelected));

    let reload = button(text("Reload"))
        .style(button::secondary)
        .on_press_maybe((!info.loading).then_some(Message::Reload));

    let bar = row![heading, horizontal_space(), select_all, delete, reload]
        .spacing(12)
        .align_y(Alignment::Center);

    container(bar)
        .width(Length::Fill)
        .padding([0, 24])
        .center_y(Length::Fixed(HEADER_HEIGHT))
        .style(|theme: &Theme| container::Style {
            background: Some(theme.extended_palette().background.weak.color.into()),
            ..container::Style::default()
        })
        .into()
}
