//! Widget styles with shadows and rounded corners.

mod buttons;
mod containers;
mod inputs;
pub mod palette;
mod shadows;

pub use palette::{Palette, current, set_theme};

pub use shadows::radius;

pub use containers::{
    alert_style, card_style, header_style, page_style, progress_bar_style, status_badge_style,
    toast_style,
};

pub use buttons::{
    article_row_style, chip_button_style, ghost_button_style, link_button_style,
    nav_button_style, outline_button_style, primary_button_style,
};

pub use inputs::{field_input_style, scrollable_style, search_input_style};
