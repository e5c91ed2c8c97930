//! Masthead with navigation, theme toggle and account controls.

use iced::widget::{Space, button, container, row, text};
use iced::{Alignment, Element, Length};

use newsdesk_api::User;
use newsdesk_core::{Route, SearchFilters, ThemeMode};

use super::common::BOLD;
use crate::message::{JobsMessage, Message};
use crate::style::widgets::{
    ghost_button_style, header_style, nav_button_style, outline_button_style, palette,
    primary_button_style,
};

/// What the header needs to know about the app.
pub struct HeaderContext<'a> {
    pub route: &'a Route,
    pub user: Option<&'a User>,
    pub theme: ThemeMode,
    pub active_jobs: usize,
    pub drawer_open: bool,
}

/// Renders the application header.
pub fn view_header(ctx: HeaderContext<'_>) -> Element<'_, Message> {
    let p = palette::current();

    let title = button(text("newsdesk").size(22).font(BOLD).color(p.primary))
        .padding([4, 8])
        .style(ghost_button_style)
        .on_press(Message::Navigate(Route::Home));

    let mut nav = row![
        nav_tab("Home", matches!(ctx.route, Route::Home), Route::Home),
        nav_tab(
            "Search",
            matches!(ctx.route, Route::Search(_)),
            Route::Search(SearchFilters::default()),
        ),
    ]
    .spacing(4);

    if ctx.user.is_some() {
        nav = nav
            .push(nav_tab("Jobs", matches!(ctx.route, Route::Jobs), Route::Jobs))
            .push(nav_tab(
                "Profile",
                matches!(ctx.route, Route::Profile),
                Route::Profile,
            ));
    }

    let theme_icon = if ctx.theme.is_dark() {
        "\u{2600}"
    } else {
        "\u{263E}"
    };
    let theme_btn = button(text(theme_icon).size(18).color(p.text_secondary))
        .padding([6, 10])
        .style(ghost_button_style)
        .on_press(Message::ToggleTheme);

    let account: Element<'_, Message> = match ctx.user {
        Some(user) => {
            let drawer_label = if ctx.active_jobs > 0 {
                format!("Jobs ({})", ctx.active_jobs)
            } else {
                "Jobs".to_string()
            };
            let drawer_btn = button(text(drawer_label).size(13))
                .padding([6, 12])
                .style(nav_button_style(ctx.drawer_open))
                .on_press(Message::Jobs(JobsMessage::ToggleDrawer));

            row![
                drawer_btn,
                text(user.name.as_str()).size(13).color(p.text_secondary),
                button(text("Sign out").size(13))
                    .padding([6, 12])
                    .style(outline_button_style)
                    .on_press(Message::Logout),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into()
        }
        None => row![
            button(text("Sign in").size(13))
                .padding([6, 12])
                .style(outline_button_style)
                .on_press(Message::Navigate(Route::Login)),
            button(text("Register").size(13))
                .padding([6, 12])
                .style(primary_button_style)
                .on_press(Message::Navigate(Route::Register)),
        ]
        .spacing(8)
        .into(),
    };

    let content = row![
        title,
        Space::new().width(16),
        nav,
        Space::new().width(Length::Fill),
        theme_btn,
        account,
    ]
    .spacing(12)
    .padding([10, 20])
    .align_y(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .style(header_style)
        .into()
}

fn nav_tab(label: &str, active: bool, route: Route) -> Element<'_, Message> {
    button(text(label).size(14))
        .padding([6, 14])
        .style(nav_button_style(active))
        .on_press(Message::Navigate(route))
        .into()
}
