//! Container style functions with theme support.

use iced::widget::{container, progress_bar};
use iced::{Background, Border, Color};

use newsdesk_api::JobStatus;
use newsdesk_core::Severity;

use super::palette;
use super::shadows;
use super::shadows::radius;

/// Application background.
pub fn page_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        background: Some(Background::Color(p.background)),
        text_color: Some(p.text_primary),
        ..Default::default()
    }
}

/// Top bar with the masthead and navigation.
pub fn header_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        background: Some(Background::Color(p.surface)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::NONE.into(),
        },
        shadow: shadows::subtle(),
        ..Default::default()
    }
}

/// Raised panel for forms, article bodies and job lists.
pub fn card_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        background: Some(Background::Color(p.surface_elevated)),
        border: Border {
            color: p.border_subtle,
            width: 1.0,
            radius: radius::LARGE.into(),
        },
        shadow: shadows::card(),
        ..Default::default()
    }
}

/// Dismissible banner above the search results.
pub fn alert_style(_theme: &iced::Theme) -> container::Style {
    let p = palette::current();
    container::Style {
        background: Some(Background::Color(Color { a: 0.12, ..p.info })),
        text_color: Some(p.text_primary),
        border: Border {
            color: p.info,
            width: 1.0,
            radius: radius::MEDIUM.into(),
        },
        ..Default::default()
    }
}

/// Toast with a colored edge for its severity.
pub fn toast_style(severity: Severity) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        container::Style {
            background: Some(Background::Color(p.surface_elevated)),
            text_color: Some(p.text_primary),
            border: Border {
                color: p.severity(severity),
                width: 2.0,
                radius: radius::MEDIUM.into(),
            },
            shadow: shadows::raised(),
            ..Default::default()
        }
    }
}

/// Pill showing a job status.
pub fn status_badge_style(status: JobStatus) -> impl Fn(&iced::Theme) -> container::Style {
    move |_theme| {
        let p = palette::current();
        let color = p.job_status(status);
        container::Style {
            background: Some(Background::Color(Color { a: 0.15, ..color })),
            text_color: Some(color),
            border: Border {
                color,
                width: 1.0,
                radius: radius::PILL.into(),
            },
            ..Default::default()
        }
    }
}

/// Job progress bar: info-colored fill on a subtle pill track.
pub fn progress_bar_style(_theme: &iced::Theme) -> progress_bar::Style {
    let p = palette::current();
    progress_bar::Style {
        background: Background::Color(p.border_subtle),
        bar: Background::Color(p.info),
        border: Border {
            radius: radius::PILL.into(),
            ..Default::default()
        },
    }
}
