//! Notification toasts.

use iced::widget::{Column, button, container, row, text};
use iced::{Alignment, Element, Length};

use newsdesk_core::Notifications;

use crate::message::Message;
use crate::style::widgets::{ghost_button_style, palette, toast_style};

/// Stack of toasts, newest last.
pub fn view_toasts(notifications: &Notifications) -> Element<'_, Message> {
    let p = palette::current();
    let toasts = notifications.iter().map(|note| {
        container(
            row![
                text(note.message.as_str())
                    .size(13)
                    .width(Length::Fill),
                button(text("\u{2715}").size(11).color(p.text_muted))
                    .padding([2, 6])
                    .style(ghost_button_style)
                    .on_press(Message::DismissToast(note.id)),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        )
        .padding([10, 14])
        .width(340)
        .style(toast_style(note.severity))
        .into()
    });

    Column::with_children(toasts).spacing(8).into()
}
