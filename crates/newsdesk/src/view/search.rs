//! Search screen: filters, hint banner and results.

use iced::widget::{Space, button, column, container, pick_list, row, text, text_input};
use iced::{Alignment, Element, Length};

use newsdesk_core::CreditRecord;

use super::articles::{page_scroll, view_feed};
use super::common::{BOLD, error_text, section};
use crate::message::{JobsMessage, Message, SearchMessage};
use crate::model::{Catalog, SearchState};
use crate::style::widgets::{
    alert_style, field_input_style, ghost_button_style, outline_button_style, palette,
    primary_button_style, search_input_style,
};

/// Search screen.
pub fn view_search<'a>(
    search: &'a SearchState,
    catalog: &'a Catalog,
    signed_in: bool,
    credits: Option<&'a CreditRecord>,
    can_submit_job: bool,
) -> Element<'a, Message> {
    let p = palette::current();

    let mut body = column![text("Search").size(26).font(BOLD).color(p.text_primary)].spacing(16);

    if signed_in && !search.alert_dismissed {
        body = body.push(hint_banner());
    }

    body = body.push(filters_panel(search, catalog));

    if signed_in {
        body = body.push(scrape_bar(search, credits, can_submit_job));
    }

    body = body.push(
        text(search.filters().describe())
            .size(13)
            .color(p.text_muted),
    );
    body = body.push(view_feed(&search.feed, |page| {
        Message::Search(SearchMessage::Page(page))
    }));

    page_scroll(body)
}

fn hint_banner<'a>() -> Element<'a, Message> {
    let p = palette::current();
    container(
        row![
            text(
                "Not finding what you need? Queue a scrape job for these filters \
                 and fresh articles will show up here once it finishes."
            )
            .size(13)
            .width(Length::Fill),
            button(text("Dismiss").size(12).color(p.text_secondary))
                .padding([4, 10])
                .style(ghost_button_style)
                .on_press(Message::Search(SearchMessage::DismissAlert)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([10, 14])
    .style(alert_style)
    .into()
}

fn filters_panel<'a>(search: &'a SearchState, catalog: &'a Catalog) -> Element<'a, Message> {
    let p = palette::current();
    let filters = search.filters();

    let keyword = text_input("Keyword", &search.form.keyword)
        .on_input(|s| Message::Search(SearchMessage::KeywordChanged(s)))
        .on_submit(Message::Search(SearchMessage::Submit))
        .padding([10, 16])
        .style(search_input_style);

    let date_error = search.form_error.map(|e| e.message());
    let date_from = text_input("From (YYYY-MM-DD)", &search.form.date_from)
        .on_input(|s| Message::Search(SearchMessage::DateFromChanged(s)))
        .on_submit(Message::Search(SearchMessage::Submit))
        .padding(10)
        .width(Length::FillPortion(1))
        .style(field_input_style(date_error.is_some()));
    let date_to = text_input("To (YYYY-MM-DD)", &search.form.date_to)
        .on_input(|s| Message::Search(SearchMessage::DateToChanged(s)))
        .on_submit(Message::Search(SearchMessage::Submit))
        .padding(10)
        .width(Length::FillPortion(1))
        .style(field_input_style(date_error.is_some()));

    let categories = catalog.category_choices();
    let selected_category = Catalog::selected(&categories, filters.category.as_deref());
    let category = pick_list(categories, selected_category, |choice| {
        Message::Search(SearchMessage::CategorySelected(choice.slug))
    })
    .placeholder("Category")
    .padding(10)
    .width(Length::FillPortion(1));

    let sources = catalog.source_choices();
    let selected_source = Catalog::selected(&sources, filters.source.as_deref());
    let source = pick_list(sources, selected_source, |choice| {
        Message::Search(SearchMessage::SourceSelected(choice.slug))
    })
    .placeholder("Source")
    .padding(10)
    .width(Length::FillPortion(1));

    let mut content = column![
        keyword,
        row![category, source].spacing(12),
        row![date_from, date_to].spacing(12),
    ]
    .spacing(12);

    if let Some(message) = date_error {
        content = content.push(error_text(message));
    }

    let actions = row![
        button(text("Search").size(14))
            .padding([8, 18])
            .style(primary_button_style)
            .on_press(Message::Search(SearchMessage::Submit)),
        button(text("Clear filters").size(13).color(p.text_secondary))
            .padding([8, 14])
            .style(ghost_button_style)
            .on_press_maybe(
                filters
                    .has_filters()
                    .then_some(Message::Search(SearchMessage::Clear)),
            ),
    ]
    .spacing(8);

    section("Filters", content.push(actions))
}

fn scrape_bar<'a>(
    search: &'a SearchState,
    credits: Option<&'a CreditRecord>,
    can_submit: bool,
) -> Element<'a, Message> {
    let p = palette::current();
    let balance = credits.map_or_else(
        || "Loading credits...".to_string(),
        |c| format!("{} of {} scrape credits left", c.remaining, c.max),
    );
    let hint = if search.filters().has_filters() {
        "Scrape with these filters"
    } else {
        "Scrape latest articles"
    };

    row![
        text(balance).size(13).color(p.text_secondary),
        Space::new().width(Length::Fill),
        button(text(hint).size(13))
            .padding([6, 12])
            .style(outline_button_style)
            .on_press_maybe(can_submit.then_some(Message::Jobs(JobsMessage::SubmitScrape))),
    ]
    .align_y(Alignment::Center)
    .into()
}
