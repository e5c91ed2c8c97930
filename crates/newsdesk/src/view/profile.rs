//! Profile screen: preferences, credits and appearance.

use chrono::{DateTime, Utc};
use iced::widget::{
    Row, Space, button, column, pick_list, row, text, text_input, toggler,
};
use iced::{Alignment, Element, Length};

use newsdesk_api::User;
use newsdesk_core::{CreditRecord, PreferencesDraft, ThemeMode};

use super::articles::page_scroll;
use super::common::{BOLD, error_text, placeholder, section};
use crate::message::{Message, ProfileMessage};
use crate::model::{Catalog, ProfileState};
use crate::style::widgets::{
    chip_button_style, field_input_style, ghost_button_style, outline_button_style, palette,
    primary_button_style,
};

const LANGUAGES: [&str; 6] = ["en", "de", "es", "fr", "it", "pt"];

/// What the profile screen shows besides the preferences themselves.
pub struct ProfileContext<'a> {
    pub user: Option<&'a User>,
    pub catalog: &'a Catalog,
    pub credits: Option<&'a CreditRecord>,
    pub theme: ThemeMode,
    pub now: DateTime<Utc>,
}

/// Profile screen.
pub fn view_profile<'a>(profile: &'a ProfileState, ctx: ProfileContext<'a>) -> Element<'a, Message> {
    let p = palette::current();

    let mut body = column![text("Profile").size(26).font(BOLD).color(p.text_primary)].spacing(16);

    if let Some(user) = ctx.user {
        body = body.push(
            column![
                text(user.name.as_str()).size(18).color(p.text_primary),
                text(user.email.as_str()).size(13).color(p.text_secondary),
            ]
            .spacing(2),
        );
    }

    body = body.push(credits_section(ctx.credits, ctx.now));
    body = body.push(appearance_section(ctx.theme));

    if let Some(error) = &profile.error {
        body = body.push(error_text(error));
    }

    match &profile.draft {
        Some(draft) => {
            body = body
                .push(follow_section(draft, ctx.catalog))
                .push(authors_section(draft, &profile.author_input))
                .push(settings_section(draft))
                .push(save_bar(profile, draft));
        }
        None if profile.is_loading => {
            body = body.push(placeholder("\u{23F3}", "Loading preferences..."));
        }
        None => {}
    }

    page_scroll(body)
}

fn credits_section(credits: Option<&CreditRecord>, now: DateTime<Utc>) -> Element<'_, Message> {
    let p = palette::current();
    let content: Element<'_, Message> = match credits {
        Some(record) => column![
            text(format!("{} of {} remaining", record.remaining, record.max))
                .size(20)
                .font(BOLD)
                .color(if record.is_exhausted() { p.danger } else { p.text_primary }),
            text(format!(
                "{} used this month \u{00B7} resets in {} days",
                record.used_this_month,
                record.days_until_reset(now)
            ))
            .size(13)
            .color(p.text_secondary),
        ]
        .spacing(4)
        .into(),
        None => text("Credits load when you sign in.")
            .size(13)
            .color(p.text_muted)
            .into(),
    };
    section("Scrape credits", content)
}

fn appearance_section<'a>(theme: ThemeMode) -> Element<'a, Message> {
    let is_dark = theme.is_dark();
    section(
        "Appearance",
        toggler(is_dark)
            .label(if is_dark { "Dark mode" } else { "Light mode" })
            .on_toggle(|_| Message::ToggleTheme)
            .text_size(14)
            .width(Length::Shrink),
    )
}

fn follow_section<'a>(draft: &'a PreferencesDraft, catalog: &'a Catalog) -> Element<'a, Message> {
    let p = palette::current();
    let prefs = draft.current();

    let categories = catalog.categories.iter().map(|c| {
        chip(
            &c.name,
            prefs.preferred_categories.contains(&c.slug),
            Message::Profile(ProfileMessage::ToggleCategory(c.slug.clone())),
        )
    });
    let sources = catalog.sources.iter().map(|s| {
        chip(
            &s.name,
            prefs.preferred_sources.contains(&s.slug),
            Message::Profile(ProfileMessage::ToggleSource(s.slug.clone())),
        )
    });

    let content: Element<'a, Message> = if catalog.is_loaded {
        column![
            text("Categories").size(12).color(p.text_secondary),
            Row::with_children(categories).spacing(6).wrap(),
            text("Sources").size(12).color(p.text_secondary),
            Row::with_children(sources).spacing(6).wrap(),
        ]
        .spacing(8)
        .into()
    } else {
        text("Loading categories and sources...")
            .size(13)
            .color(p.text_muted)
            .into()
    };

    section("Follow", content)
}

fn authors_section<'a>(draft: &'a PreferencesDraft, input: &'a str) -> Element<'a, Message> {
    let p = palette::current();

    let followed = draft.current().preferred_authors.iter().map(|name| {
        row![
            text(name.as_str()).size(13),
            button(text("\u{2715}").size(11).color(p.text_muted))
                .padding([2, 6])
                .style(ghost_button_style)
                .on_press(Message::Profile(ProfileMessage::RemoveAuthor(name.clone()))),
        ]
        .spacing(4)
        .align_y(Alignment::Center)
        .into()
    });

    let add = row![
        text_input("Author name", input)
            .on_input(|s| Message::Profile(ProfileMessage::AuthorInputChanged(s)))
            .on_submit(Message::Profile(ProfileMessage::AddAuthor))
            .padding(8)
            .style(field_input_style(false)),
        button(text("Add").size(13))
            .padding([8, 14])
            .style(outline_button_style)
            .on_press_maybe(
                (!input.trim().is_empty()).then_some(Message::Profile(ProfileMessage::AddAuthor)),
            ),
    ]
    .spacing(8);

    section(
        "Authors",
        column![Row::with_children(followed).spacing(12).wrap(), add].spacing(10),
    )
}

fn settings_section(draft: &PreferencesDraft) -> Element<'_, Message> {
    let p = palette::current();
    let prefs = draft.current();
    let language = LANGUAGES
        .iter()
        .copied()
        .find(|code| *code == prefs.language);

    let content = column![
        row![
            text("Language").size(13).color(p.text_secondary).width(120),
            pick_list(LANGUAGES, language, |code: &str| {
                Message::Profile(ProfileMessage::LanguageChanged(code.to_string()))
            })
            .padding(8),
        ]
        .align_y(Alignment::Center),
        row![
            text("Timezone").size(13).color(p.text_secondary).width(120),
            text_input("UTC", &prefs.timezone)
                .on_input(|s| Message::Profile(ProfileMessage::TimezoneChanged(s)))
                .padding(8)
                .width(240)
                .style(field_input_style(false)),
        ]
        .align_y(Alignment::Center),
        toggler(prefs.email_notifications)
            .label("Email me a daily digest")
            .on_toggle(|on| Message::Profile(ProfileMessage::EmailNotificationsToggled(on)))
            .text_size(13)
            .width(Length::Shrink),
    ]
    .spacing(12);

    section("Settings", content)
}

fn save_bar<'a>(profile: &'a ProfileState, draft: &'a PreferencesDraft) -> Element<'a, Message> {
    let p = palette::current();
    let status = if profile.is_saving {
        "Saving..."
    } else if draft.is_dirty() {
        "Unsaved changes"
    } else {
        "All changes saved"
    };

    row![
        text(status).size(13).color(p.text_muted),
        Space::new().width(Length::Fill),
        button(text("Discard").size(13))
            .padding([8, 14])
            .style(ghost_button_style)
            .on_press_maybe(
                (draft.is_dirty() && !profile.is_saving)
                    .then_some(Message::Profile(ProfileMessage::Reset)),
            ),
        button(text("Save preferences").size(14))
            .padding([8, 18])
            .style(primary_button_style)
            .on_press_maybe(
                profile
                    .can_save()
                    .then_some(Message::Profile(ProfileMessage::Save)),
            ),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}

fn chip<'a>(label: &'a str, selected: bool, on_press: Message) -> Element<'a, Message> {
    button(text(label).size(12))
        .padding([5, 12])
        .style(chip_button_style(selected))
        .on_press(on_press)
        .into()
}
