//! Color palette with light and dark theme support.
//!
//! Light mode leans on warm newsprint tones; dark mode is a low-glare
//! reading theme.

use iced::Color;
use newsdesk_core::ThemeMode;

use newsdesk_api::JobStatus;
use newsdesk_core::Severity;

/// Complete color palette for the application.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    // Brand
    pub primary: Color,
    pub primary_light: Color,
    pub primary_dark: Color,

    // Surfaces
    pub surface: Color,
    pub surface_elevated: Color,
    pub background: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_on_primary: Color,

    // Semantic
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // States
    pub selected: Color,
    pub hover: Color,

    // Borders
    pub border_subtle: Color,
    pub border_medium: Color,

    // Shadows
    pub shadow: Color,
    pub shadow_medium: Color,
}

impl Palette {
    /// Light theme palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::from_rgb(0.75, 0.16, 0.16), // masthead red
            primary_light: Color::from_rgb(0.86, 0.30, 0.28),
            primary_dark: Color::from_rgb(0.58, 0.10, 0.11),

            surface: Color::WHITE,
            surface_elevated: Color::from_rgb(0.995, 0.99, 0.98),
            background: Color::from_rgb(0.97, 0.96, 0.94), // newsprint

            text_primary: Color::from_rgb(0.11, 0.11, 0.12),
            text_secondary: Color::from_rgb(0.38, 0.38, 0.40),
            text_muted: Color::from_rgb(0.58, 0.58, 0.60),
            text_on_primary: Color::WHITE,

            success: Color::from_rgb(0.16, 0.60, 0.34),
            warning: Color::from_rgb(0.90, 0.62, 0.05),
            danger: Color::from_rgb(0.84, 0.20, 0.24),
            info: Color::from_rgb(0.15, 0.45, 0.85),

            selected: Color::from_rgb(0.98, 0.93, 0.92),
            hover: Color::from_rgb(0.96, 0.95, 0.93),

            border_subtle: Color::from_rgb(0.90, 0.89, 0.87),
            border_medium: Color::from_rgb(0.82, 0.81, 0.79),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.05),
            shadow_medium: Color::from_rgba(0.0, 0.0, 0.0, 0.10),
        }
    }

    /// Dark theme palette.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::from_rgb(1.0, 0.45, 0.42),
            primary_light: Color::from_rgb(1.0, 0.58, 0.55),
            primary_dark: Color::from_rgb(0.85, 0.35, 0.33),

            surface: Color::from_rgb(0.13, 0.13, 0.14),
            surface_elevated: Color::from_rgb(0.16, 0.16, 0.17),
            background: Color::from_rgb(0.09, 0.09, 0.10),

            text_primary: Color::from_rgb(0.92, 0.91, 0.89),
            text_secondary: Color::from_rgb(0.68, 0.67, 0.65),
            text_muted: Color::from_rgb(0.50, 0.50, 0.50),
            text_on_primary: Color::from_rgb(0.09, 0.09, 0.10),

            success: Color::from_rgb(0.35, 0.85, 0.55),
            warning: Color::from_rgb(1.0, 0.80, 0.30),
            danger: Color::from_rgb(1.0, 0.42, 0.45),
            info: Color::from_rgb(0.45, 0.70, 1.0),

            selected: Color::from_rgb(0.22, 0.15, 0.15),
            hover: Color::from_rgb(0.18, 0.18, 0.19),

            border_subtle: Color::from_rgb(0.22, 0.22, 0.23),
            border_medium: Color::from_rgb(0.30, 0.30, 0.31),

            shadow: Color::from_rgba(0.0, 0.0, 0.0, 0.25),
            shadow_medium: Color::from_rgba(0.0, 0.0, 0.0, 0.35),
        }
    }

    /// Gets the palette for a given theme mode.
    #[must_use]
    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// Badge color for a job status.
    #[must_use]
    pub const fn job_status(&self, status: JobStatus) -> Color {
        match status {
            JobStatus::Queued => self.text_muted,
            JobStatus::Started | JobStatus::InProgress => self.info,
            JobStatus::Completed => self.success,
            JobStatus::Failed => self.danger,
            JobStatus::Cancelled => self.warning,
        }
    }

    /// Accent color for a notification.
    #[must_use]
    pub const fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Success => self.success,
            Severity::Warning => self.warning,
            Severity::Error => self.danger,
        }
    }
}

/// Current active palette, light until the stored theme is applied.
pub static CURRENT: std::sync::LazyLock<std::sync::RwLock<Palette>> =
    std::sync::LazyLock::new(|| std::sync::RwLock::new(Palette::light()));

/// Sets the current global palette.
pub fn set_theme(mode: ThemeMode) {
    if let Ok(mut palette) = CURRENT.write() {
        *palette = Palette::for_mode(mode);
    }
}

/// Gets a copy of the current palette.
#[must_use]
pub fn current() -> Palette {
    CURRENT.read().map_or_else(|_| Palette::light(), |p| *p)
}
