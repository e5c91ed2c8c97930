//! Article lists, pagination and the article reader.

use iced::widget::{Column, Space, button, column, container, markdown, row, scrollable, text};
use iced::{Alignment, Element, Length};

use newsdesk_api::{Article, Paginated};
use newsdesk_core::{Route, ThemeMode};

use super::common::{BOLD, SEMIBOLD, error_text, placeholder};
use crate::message::Message;
use crate::model::{ArticleState, FeedState, byline};
use crate::style::widgets::{
    article_row_style, card_style, ghost_button_style, outline_button_style, palette,
    primary_button_style, scrollable_style,
};

/// Home screen: the feed picked for this user.
pub fn view_home(feed: &FeedState) -> Element<'_, Message> {
    let p = palette::current();
    let heading = row![
        text(feed.mode.title()).size(26).font(BOLD).color(p.text_primary),
        Space::new().width(Length::Fill),
        button(text("\u{21BB} Refresh").size(13))
            .padding([6, 12])
            .style(outline_button_style)
            .on_press(Message::KeyPressed(crate::message::KeyboardAction::Refresh)),
    ]
    .align_y(Alignment::Center);

    let body = column![heading, view_feed(feed, Message::FeedPage)].spacing(16);
    page_scroll(body)
}

/// List of articles with a pager, or the right placeholder.
pub fn view_feed<'a>(
    feed: &'a FeedState,
    on_page: impl Fn(u32) -> Message + 'a,
) -> Element<'a, Message> {
    let mut content = Column::new().spacing(12);

    if let Some(error) = &feed.error {
        content = content.push(error_text(error));
    }

    match &feed.results {
        None if feed.is_loading => return placeholder("\u{23F3}", "Loading articles..."),
        None => {}
        Some(page) if page.is_empty() => {
            content = content.push(placeholder("\u{1F4F0}", "No articles match."));
        }
        Some(page) => {
            for article in &page.data {
                content = content.push(article_row(article));
            }
            content = content.push(pager(page, feed.is_loading, on_page));
        }
    }

    content.into()
}

fn article_row(article: &Article) -> Element<'_, Message> {
    let p = palette::current();
    let mut col = column![text(article.title.as_str()).size(17).font(SEMIBOLD)].spacing(6);

    if let Some(summary) = article.description.as_deref().filter(|d| !d.is_empty()) {
        col = col.push(text(summary).size(13).color(p.text_secondary));
    }

    let mut meta = row![text(byline(article)).size(12).color(p.text_muted)].spacing(12);
    if let Some(category) = &article.category {
        meta = meta.push(text(category.name.as_str()).size(12).color(p.primary));
    }
    col = col.push(meta);

    button(col)
        .padding(16)
        .width(Length::Fill)
        .style(article_row_style)
        .on_press(Message::Navigate(Route::Article(article.id)))
        .into()
}

fn pager<'a>(
    page: &Paginated<Article>,
    is_loading: bool,
    on_page: impl Fn(u32) -> Message + 'a,
) -> Element<'a, Message> {
    let p = palette::current();
    let current = page.current_page;

    let prev = button(text("\u{2190} Newer").size(13))
        .padding([6, 12])
        .style(outline_button_style)
        .on_press_maybe((page.has_prev() && !is_loading).then(|| on_page(current - 1)));
    let next = button(text("Older \u{2192}").size(13))
        .padding([6, 12])
        .style(outline_button_style)
        .on_press_maybe((page.has_next() && !is_loading).then(|| on_page(current + 1)));

    let status = format!(
        "Page {current} of {} \u{00B7} {} articles",
        page.last_page.max(1),
        page.total
    );

    row![
        prev,
        Space::new().width(Length::Fill),
        text(status).size(12).color(p.text_muted),
        Space::new().width(Length::Fill),
        next,
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Article reader.
pub fn view_article(state: &ArticleState, theme: ThemeMode) -> Element<'_, Message> {
    let p = palette::current();

    let back = button(text("\u{2190} Back").size(13))
        .padding([6, 12])
        .style(ghost_button_style)
        .on_press(Message::KeyPressed(crate::message::KeyboardAction::Back));

    let Some(article) = &state.article else {
        let body = if state.is_loading {
            placeholder("\u{23F3}", "Loading article...")
        } else {
            error_text(state.error.as_deref().unwrap_or("Article not found."))
        };
        return page_scroll(column![back, body].spacing(16));
    };

    let mut header = column![
        text(article.title.as_str()).size(30).font(BOLD).color(p.text_primary),
        text(byline(article)).size(13).color(p.text_muted),
    ]
    .spacing(8);

    if let Some(summary) = article.description.as_deref().filter(|d| !d.is_empty()) {
        header = header.push(text(summary).size(16).color(p.text_secondary));
    }

    let reader_theme = if theme.is_dark() {
        iced::Theme::Dark
    } else {
        iced::Theme::Light
    };
    let body: Element<'_, Message> = if state.body.is_empty() {
        text("No content available. Read it at the source.")
            .size(14)
            .color(p.text_muted)
            .into()
    } else {
        markdown::view(&state.body, reader_theme).map(Message::LinkClicked)
    };

    let open = button(text("Read the original \u{2197}").size(14).font(SEMIBOLD))
        .padding([10, 20])
        .style(primary_button_style)
        .on_press(Message::OpenUrl(article.url.clone()));

    let card = container(column![header, body, open].spacing(20))
        .padding(28)
        .width(Length::Fill)
        .style(card_style);

    page_scroll(column![back, card].spacing(16))
}

/// Scrollable, centered column used by every list screen.
pub fn page_scroll<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    scrollable(
        container(container(content).max_width(860).padding([24, 32])).center_x(Length::Fill),
    )
    .height(Length::Fill)
    .style(scrollable_style)
    .into()
}
