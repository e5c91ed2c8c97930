//! Building blocks shared by several screens.

use iced::widget::{Space, column, container, text, text_input};
use iced::{Alignment, Element, Font, Length};

use crate::message::Message;
use crate::style::widgets::{self, palette};

/// Semibold variant of the default font.
pub const SEMIBOLD: Font = Font {
    weight: iced::font::Weight::Semibold,
    ..Font::DEFAULT
};

/// Bold variant of the default font.
pub const BOLD: Font = Font {
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

/// Card with a title above its content.
pub fn section<'a>(title: &'a str, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text(title).size(16).font(SEMIBOLD).color(p.text_primary),
            Space::new().height(8),
            content.into(),
        ]
        .spacing(8),
    )
    .padding(20)
    .width(Length::Fill)
    .style(widgets::card_style)
    .into()
}

/// Text input with a label above and an error below.
pub fn labeled_input<'a>(
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    field(label, text_input(placeholder, value).on_input(on_input), error)
}

/// Masked text input with a label above and an error below.
pub fn labeled_password<'a>(
    label: &'a str,
    value: &'a str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Message,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    field(
        label,
        text_input("", value)
            .on_input(on_input)
            .on_submit(on_submit)
            .secure(true),
        error,
    )
}

fn field<'a>(
    label: &'a str,
    input: iced::widget::TextInput<'a, Message>,
    error: Option<&'a str>,
) -> Element<'a, Message> {
    let p = palette::current();
    let mut col = column![
        text(label).size(12).color(p.text_secondary),
        input
            .padding(10)
            .style(widgets::field_input_style(error.is_some())),
    ]
    .spacing(4);

    if let Some(err) = error {
        col = col.push(text(err).size(11).color(p.danger));
    }

    col.into()
}

/// Error line in the danger color.
pub fn error_text(message: &str) -> Element<'_, Message> {
    text(message).size(13).color(palette::current().danger).into()
}

/// Centered placeholder for empty or loading lists.
pub fn placeholder<'a>(icon: &'a str, message: &'a str) -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text(icon).size(40),
            text(message).size(15).color(p.text_secondary),
        ]
        .spacing(12)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(48)
    .center_x(Length::Fill)
    .into()
}
