/// The list of entries next to the canvas
///
/// One row per entry, top of the list = bottom of the stack. Each row's
/// buttons carry the index the row has in this render, so they are
/// rebuilt on every `view`.
use std::collections::HashMap;

use iced::widget::image::{Handle, Image};
use iced::widget::{button, column, row, text, tooltip, Column, Space};
use iced::{Alignment, Element, Length};

use crate::state::{EntryId, ImageEntry, Stack};
use crate::Message;

pub fn view<'a>(
    stack: &'a Stack,
    thumbnails: &'a HashMap<EntryId, Handle>,
    thumbnail_size: u32,
) -> Element<'a, Message> {
    if stack.is_empty() {
        return column![text("No images yet. Use \"Add file\" to start.").size(14)].into();
    }

    let last = stack.len() - 1;
    let rows = stack.iter().enumerate().map(|(index, entry)| {
        entry_row(
            index,
            last,
            entry,
            thumbnails.get(&entry.id),
            thumbnail_size as f32,
        )
    });

    Column::with_children(rows).spacing(8).into()
}

fn entry_row<'a>(
    index: usize,
    last: usize,
    entry: &'a ImageEntry,
    thumbnail: Option<&Handle>,
    size: f32,
) -> Element<'a, Message> {
    let preview: Element<'a, Message> = match thumbnail {
        Some(handle) => Image::new(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        None => Space::new(Length::Fixed(size), Length::Fixed(size)).into(),
    };

    let info = column![
        tooltip(
            text(entry.source.name.as_str()).size(14),
            text(entry.source.path.display().to_string()).size(12),
            tooltip::Position::Bottom,
        ),
        text(format!(
            "{} x {}, {} KB",
            entry.width(),
            entry.height(),
            entry.source.len / 1024
        ))
        .size(12),
    ]
    .spacing(2)
    .width(Length::Fill);

    row![
        preview,
        info,
        button("Up")
            .on_press_maybe((index > 0).then_some(Message::MoveUp(index)))
            .padding(6),
        button("Down")
            .on_press_maybe((index < last).then_some(Message::MoveDown(index)))
            .padding(6),
        button("Remove")
            .on_press(Message::Remove(index))
            .padding(6),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
