//! Jobs page and the compact jobs drawer.

use chrono::{DateTime, Utc};
use iced::widget::{
    Column, Row, Space, button, column, container, progress_bar, row, scrollable, text, toggler,
};
use iced::{Alignment, Element, Length};

use newsdesk_api::Job;
use newsdesk_core::JobActions;

use super::articles::page_scroll;
use super::common::{BOLD, SEMIBOLD, error_text, placeholder, section};
use crate::message::{JobsMessage, Message};
use crate::model::JobsState;
use crate::style::widgets::{
    card_style, ghost_button_style, outline_button_style, palette, primary_button_style,
    progress_bar_style, scrollable_style, status_badge_style,
};

/// Full jobs page.
pub fn view_jobs_page(jobs: &JobsState, now: DateTime<Utc>) -> Element<'_, Message> {
    let p = palette::current();

    let refresh = button(text("\u{21BB} Refresh").size(13))
        .padding([6, 12])
        .style(outline_button_style)
        .on_press_maybe((!jobs.is_loading).then_some(Message::Jobs(JobsMessage::Refresh)));

    let auto = toggler(jobs.page_auto_refresh)
        .label("Auto-refresh")
        .on_toggle(|on| Message::Jobs(JobsMessage::PageAutoRefresh(on)))
        .text_size(13)
        .width(Length::Shrink);

    let heading = row![
        text("Scrape jobs").size(26).font(BOLD).color(p.text_primary),
        Space::new().width(Length::Fill),
        auto,
        refresh,
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut body = column![heading].spacing(16);

    if let Some(credits) = &jobs.credits {
        let submit = button(text("New scrape job").size(13))
            .padding([8, 14])
            .style(primary_button_style)
            .on_press_maybe(jobs.can_submit().then_some(Message::Jobs(JobsMessage::SubmitScrape)));
        body = body.push(
            row![
                text(format!(
                    "{} of {} credits left \u{00B7} resets in {} days",
                    credits.remaining,
                    credits.max,
                    credits.days_until_reset(now)
                ))
                .size(13)
                .color(p.text_secondary),
                Space::new().width(Length::Fill),
                submit,
            ]
            .align_y(Alignment::Center),
        );
    }

    if let Some(error) = &jobs.error {
        body = body.push(error_text(error));
    }

    let buckets = jobs.monitor.buckets();
    if !jobs.monitor.is_loaded() {
        body = body.push(placeholder("\u{23F3}", "Loading jobs..."));
    } else if buckets.is_empty() {
        body = body.push(placeholder("\u{1F4ED}", "No scrape jobs yet."));
    } else {
        body = body
            .push(section(
                "Active",
                job_list(&buckets.active, jobs, "Nothing running."),
            ))
            .push(section(
                "Recently finished",
                job_list(&buckets.completed, jobs, "Nothing finished yet."),
            ));
    }

    page_scroll(body)
}

fn job_list<'a>(list: &'a [Job], jobs: &'a JobsState, empty: &'a str) -> Element<'a, Message> {
    if list.is_empty() {
        return text(empty)
            .size(13)
            .color(palette::current().text_muted)
            .into();
    }
    Column::with_children(list.iter().map(|job| job_row(job, jobs)))
        .spacing(10)
        .into()
}

/// Cancel, retry and view buttons offered for the job's status.
fn job_actions<'a>(job: &'a Job, jobs: &JobsState, size: u16) -> Row<'a, Message> {
    let actions = JobActions::for_status(job.status);
    let busy = jobs.pending.contains(&job.id);
    let pad = [size / 3, size - 2];

    let mut buttons = row![].spacing(6);
    if actions.cancel {
        buttons = buttons.push(
            button(text("Cancel").size(f32::from(size)))
                .padding(pad)
                .style(outline_button_style)
                .on_press_maybe((!busy).then_some(Message::Jobs(JobsMessage::Cancel(job.id)))),
        );
    }
    if actions.retry {
        buttons = buttons.push(
            button(text("Retry").size(f32::from(size)))
                .padding(pad)
                .style(outline_button_style)
                .on_press_maybe((!busy).then_some(Message::Jobs(JobsMessage::Retry(job.id)))),
        );
    }
    if actions.view {
        buttons = buttons.push(
            button(text("View").size(f32::from(size)))
                .padding(pad)
                .style(ghost_button_style)
                .on_press(Message::Jobs(JobsMessage::View(job.filters.clone()))),
        );
    }
    buttons
}

fn job_row<'a>(job: &'a Job, jobs: &'a JobsState) -> Element<'a, Message> {
    let p = palette::current();

    let mut info = column![
        row![
            status_badge(job),
            text(job.filters.summary()).size(14).font(SEMIBOLD),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        text(format!(
            "#{} \u{00B7} queued {}",
            job.id,
            job.created_at.format("%-d %b %H:%M")
        ))
        .size(12)
        .color(p.text_muted),
    ]
    .spacing(6);

    if job.status.is_active() {
        info = info.push(job_progress(job.progress));
    }
    if let Some(reason) = &job.error_message {
        info = info.push(text(reason.as_str()).size(12).color(p.danger));
    }

    row![info.width(Length::Fill), job_actions(job, jobs, 12)]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
}

fn status_badge(job: &Job) -> Element<'_, Message> {
    container(text(job.status.label()).size(11).font(SEMIBOLD))
        .padding([2, 8])
        .style(status_badge_style(job.status))
        .into()
}

fn job_progress<'a>(progress: u8) -> Element<'a, Message> {
    progress_bar(0.0..=100.0, f32::from(progress.min(100)))
        .girth(6.0)
        .style(progress_bar_style)
        .into()
}

/// Compact drawer listing running and recently finished jobs, shown beside
/// the article lists.
pub fn view_jobs_drawer(jobs: &JobsState) -> Element<'_, Message> {
    let p = palette::current();
    let buckets = jobs.monitor.buckets();

    let header = row![
        text("Jobs").size(15).font(SEMIBOLD).color(p.text_primary),
        Space::new().width(Length::Fill),
        button(text("\u{2715}").size(12).color(p.text_muted))
            .padding([2, 6])
            .style(ghost_button_style)
            .on_press(Message::Jobs(JobsMessage::ToggleDrawer)),
    ]
    .align_y(Alignment::Center);

    let auto = toggler(jobs.drawer_auto_refresh)
        .label("Auto-refresh")
        .on_toggle(|on| Message::Jobs(JobsMessage::DrawerAutoRefresh(on)))
        .text_size(12)
        .width(Length::Shrink);

    let list: Element<'_, Message> = if jobs.monitor.is_loaded() {
        column![
            drawer_bucket("Running", &buckets.active, jobs, "No jobs running."),
            drawer_bucket("Finished", &buckets.completed, jobs, "Nothing finished yet."),
        ]
        .spacing(16)
        .into()
    } else {
        text("Loading...").size(12).color(p.text_muted).into()
    };

    let all = button(text("All jobs \u{2192}").size(12))
        .padding([4, 8])
        .style(ghost_button_style)
        .on_press(Message::Navigate(newsdesk_core::Route::Jobs));

    container(
        column![header, auto, scrollable(list).style(scrollable_style).height(Length::Fill), all]
            .spacing(12),
    )
    .padding(16)
    .width(280)
    .height(Length::Fill)
    .style(card_style)
    .into()
}

fn drawer_bucket<'a>(
    title: &'a str,
    list: &'a [Job],
    jobs: &'a JobsState,
    empty: &'a str,
) -> Element<'a, Message> {
    let p = palette::current();
    let heading = text(title).size(12).font(SEMIBOLD).color(p.text_secondary);

    if list.is_empty() {
        return column![heading, text(empty).size(12).color(p.text_muted)]
            .spacing(6)
            .into();
    }

    let rows = list.iter().map(|job| {
        let mut entry = column![
            row![status_badge(job), text(job.filters.summary()).size(12)]
                .spacing(6)
                .align_y(Alignment::Center),
        ]
        .spacing(4);
        if job.status.is_active() {
            entry = entry.push(job_progress(job.progress));
        }
        entry.push(job_actions(job, jobs, 11)).into()
    });

    column![heading, Column::with_children(rows).spacing(10)]
        .spacing(6)
        .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use newsdesk_api::{JobFilters, JobId, JobStatus};

    fn job(id: i64, status: JobStatus, progress: u8) -> Job {
        Job {
            id: JobId(id),
            job_type: "scrape".to_string(),
            status,
            filters: JobFilters::default(),
            progress,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            failed_at: None,
            updated_at: None,
            error_message: (status == JobStatus::Failed).then(|| "timeout".to_string()),
        }
    }

    #[test]
    fn test_drawer_and_page_render_both_buckets() {
        let mut jobs = JobsState {
            drawer_open: true,
            ..JobsState::default()
        };
        jobs.monitor.update(vec![
            job(1, JobStatus::Queued, 0),
            job(2, JobStatus::InProgress, 140),
            job(3, JobStatus::Failed, 30),
            job(4, JobStatus::Completed, 100),
        ]);
        jobs.pending.insert(JobId(1));
        let buckets = jobs.monitor.buckets();
        assert_eq!(buckets.active.len(), 2);
        assert_eq!(buckets.completed.len(), 2);

        let _drawer = view_jobs_drawer(&jobs);
        let _page = view_jobs_page(&jobs, Utc::now());
    }
}
