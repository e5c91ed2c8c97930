//! Text input and scrollable style functions.

use iced::widget::{container, scrollable, text_input};
use iced::{Background, Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Form field, outlined in red when `invalid`.
pub fn field_input_style(
    invalid: bool,
) -> impl Fn(&iced::Theme, text_input::Status) -> text_input::Style {
    move |_theme, status| {
        let p = palette::current();
        let rest = if invalid { p.danger } else { p.border_medium };

        let base = text_input::Style {
            background: Background::Color(p.surface),
            border: Border {
                color: rest,
                width: 1.0,
                radius: radius::MEDIUM.into(),
            },
            icon: p.text_muted,
            placeholder: p.text_muted,
            value: p.text_primary,
            selection: p.selected,
        };

        match status {
            text_input::Status::Active => base,
            text_input::Status::Hovered => text_input::Style {
                border: Border {
                    color: if invalid { p.danger } else { p.text_muted },
                    ..base.border
                },
                ..base
            },
            text_input::Status::Focused { .. } => text_input::Style {
                border: Border {
                    color: if invalid { p.danger } else { p.primary },
                    width: 2.0,
                    ..base.border
                },
                ..base
            },
            text_input::Status::Disabled => text_input::Style {
                background: Background::Color(p.background),
                value: p.text_muted,
                ..base
            },
        }
    }
}

/// Search box in the header and on the search screen.
pub fn search_input_style(theme: &iced::Theme, status: text_input::Status) -> text_input::Style {
    let p = palette::current();
    let style = field_input_style(false)(theme, status);
    match status {
        text_input::Status::Active => text_input::Style {
            background: Background::Color(p.background),
            border: Border {
                color: p.border_subtle,
                radius: radius::PILL.into(),
                ..style.border
            },
            ..style
        },
        _ => text_input::Style {
            border: Border {
                radius: radius::PILL.into(),
                ..style.border
            },
            ..style
        },
    }
}

/// Scrollable style.
pub fn scrollable_style(_theme: &iced::Theme, status: scrollable::Status) -> scrollable::Style {
    let p = palette::current();

    let rail = scrollable::Rail {
        background: Some(Background::Color(Color::TRANSPARENT)),
        border: Border::default(),
        scroller: scrollable::Scroller {
            background: Background::Color(p.border_medium),
            border: Border {
                color: Color::TRANSPARENT,
                width: 0.0,
                radius: radius::PILL.into(),
            },
        },
    };

    let base = scrollable::Style {
        container: container::Style::default(),
        vertical_rail: rail,
        horizontal_rail: rail,
        gap: None,
        auto_scroll: scrollable::AutoScroll {
            background: Background::Color(p.surface),
            border: Border::default(),
            shadow: shadows::none(),
            icon: p.text_muted,
        },
    };

    match status {
        scrollable::Status::Active { .. } => base,
        scrollable::Status::Hovered {
            is_vertical_scrollbar_hovered,
            ..
        } => {
            let mut style = base;
            if is_vertical_scrollbar_hovered {
                style.vertical_rail.scroller.background = Background::Color(p.text_muted);
            }
            style
        }
        scrollable::Status::Dragged {
            is_vertical_scrollbar_dragged,
            ..
        } => {
            let mut style = base;
            if is_vertical_scrollbar_dragged {
                style.vertical_rail.scroller.background = Background::Color(p.primary);
            }
            style
        }
    }
}
