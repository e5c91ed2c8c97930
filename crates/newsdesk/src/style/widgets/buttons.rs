//! Button style functions with theme support.

use iced::widget::button::{Status, Style};
use iced::{Background, Border, Color};

use super::palette;
use super::shadows;
use super::shadows::radius;

fn fill(color: Color) -> Option<Background> {
    Some(Background::Color(color))
}

/// One-pixel border.
fn edge(color: Color, corner: f32) -> Border {
    Border {
        color,
        width: 1.0,
        radius: corner.into(),
    }
}

/// Filled call-to-action button.
pub fn primary_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let style = Style {
        background: fill(p.primary),
        text_color: p.text_on_primary,
        border: edge(p.primary_dark, radius::MEDIUM),
        shadow: shadows::glow(p.primary),
        snap: false,
    };

    match status {
        Status::Active => style,
        Status::Hovered => Style {
            background: fill(p.primary_light),
            ..style
        },
        Status::Pressed => Style {
            background: fill(p.primary_dark),
            shadow: shadows::subtle(),
            ..style
        },
        // Submitting, or the form is incomplete.
        Status::Disabled => Style {
            background: fill(p.text_muted),
            text_color: p.surface,
            border: edge(p.text_muted, radius::MEDIUM),
            shadow: shadows::none(),
            snap: false,
        },
    }
}

/// Transparent button that gains a surface on hover.
pub fn ghost_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let idle = Style {
        background: fill(Color::TRANSPARENT),
        text_color: p.text_primary,
        border: Border {
            radius: radius::MEDIUM.into(),
            ..Border::default()
        },
        shadow: shadows::none(),
        snap: false,
    };

    match status {
        Status::Active => idle,
        Status::Hovered => Style {
            background: fill(p.hover),
            border: edge(p.border_subtle, radius::MEDIUM),
            ..idle
        },
        Status::Pressed => Style {
            background: fill(p.selected),
            ..idle
        },
        Status::Disabled => Style {
            text_color: p.text_muted,
            ..idle
        },
    }
}

/// Outlined button for secondary actions like Cancel or Retry.
pub fn outline_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let (background, border_color, text_color) = match status {
        Status::Active => (p.surface, p.border_medium, p.text_primary),
        Status::Hovered => (p.hover, p.primary, p.text_primary),
        Status::Pressed => (p.selected, p.border_medium, p.text_primary),
        Status::Disabled => (p.surface, p.border_subtle, p.text_muted),
    };
    Style {
        background: fill(background),
        text_color,
        border: edge(border_color, radius::MEDIUM),
        shadow: shadows::none(),
        snap: false,
    }
}

/// Navigation tab in the header, highlighted when `active`.
pub fn nav_button_style(active: bool) -> impl Fn(&iced::Theme, Status) -> Style {
    move |theme, status| {
        let p = palette::current();
        let base = ghost_button_style(theme, status);
        if active {
            Style {
                background: fill(p.selected),
                text_color: p.primary,
                ..base
            }
        } else {
            Style {
                text_color: p.text_secondary,
                ..base
            }
        }
    }
}

/// Chip used for toggling a category or source preference.
pub fn chip_button_style(selected: bool) -> impl Fn(&iced::Theme, Status) -> Style {
    move |_theme, status| {
        let p = palette::current();
        let hovered = matches!(status, Status::Hovered);
        let (background, text_color, border_color) = match (selected, hovered) {
            (true, false) => (p.primary, p.text_on_primary, p.primary_dark),
            (true, true) => (p.primary_light, p.text_on_primary, p.primary_dark),
            (false, false) => (p.surface, p.text_secondary, p.border_medium),
            (false, true) => (p.hover, p.text_secondary, p.border_medium),
        };
        Style {
            background: fill(background),
            text_color,
            border: edge(border_color, radius::PILL),
            shadow: shadows::none(),
            snap: false,
        }
    }
}

/// Article row in a list.
pub fn article_row_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    let card = Style {
        background: fill(p.surface),
        text_color: p.text_primary,
        border: edge(p.border_subtle, radius::LARGE),
        shadow: shadows::subtle(),
        snap: false,
    };

    match status {
        Status::Active | Status::Disabled => card,
        Status::Hovered => Style {
            border: edge(p.border_medium, radius::LARGE),
            shadow: shadows::card(),
            ..card
        },
        Status::Pressed => Style {
            background: fill(p.selected),
            ..card
        },
    }
}

/// Plain text link, e.g. "Forgot password?".
pub fn link_button_style(_theme: &iced::Theme, status: Status) -> Style {
    let p = palette::current();
    Style {
        background: None,
        text_color: match status {
            Status::Hovered | Status::Pressed => p.primary_dark,
            Status::Disabled => p.text_muted,
            Status::Active => p.primary,
        },
        border: Border::default(),
        shadow: shadows::none(),
        snap: false,
    }
}
