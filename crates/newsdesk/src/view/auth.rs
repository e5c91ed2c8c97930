//! Sign-in, registration and password reset screens.

use iced::widget::{Space, button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length};

use newsdesk_core::Route;

use super::common::{error_text, labeled_input, labeled_password, section, BOLD};
use crate::message::{AuthMessage, Message};
use crate::model::{ForgotPasswordForm, LoginForm, RegisterForm};
use crate::style::widgets::{link_button_style, palette, primary_button_style};

/// Sign-in screen.
pub fn view_login(form: &LoginForm) -> Element<'_, Message> {
    let mut fields = column![
        labeled_input(
            "Email",
            "you@example.com",
            &form.email,
            |s| Message::Auth(AuthMessage::LoginEmailChanged(s)),
            form.errors.get("email"),
        ),
        labeled_password(
            "Password",
            &form.password,
            |s| Message::Auth(AuthMessage::LoginPasswordChanged(s)),
            Message::Auth(AuthMessage::SubmitLogin),
            form.errors.get("password"),
        ),
    ]
    .spacing(12);

    if let Some(error) = &form.error {
        fields = fields.push(error_text(error));
    }

    let submit = submit_button(
        "Sign in",
        "Signing in...",
        form.is_submitting,
        Message::Auth(AuthMessage::SubmitLogin),
    );

    let links = row![
        link("Forgot password?", Route::ForgotPassword),
        Space::new().width(Length::Fill),
        link("Create an account", Route::Register),
    ];

    page(
        "Welcome back",
        "Sign in to see your personalized feed.",
        column![fields, submit, links].spacing(16),
    )
}

/// Account creation screen.
pub fn view_register(form: &RegisterForm) -> Element<'_, Message> {
    let mut fields = column![
        labeled_input(
            "Name",
            "Ada Lovelace",
            &form.name,
            |s| Message::Auth(AuthMessage::RegisterNameChanged(s)),
            form.errors.get("name"),
        ),
        labeled_input(
            "Email",
            "you@example.com",
            &form.email,
            |s| Message::Auth(AuthMessage::RegisterEmailChanged(s)),
            form.errors.get("email"),
        ),
        labeled_password(
            "Password",
            &form.password,
            |s| Message::Auth(AuthMessage::RegisterPasswordChanged(s)),
            Message::Auth(AuthMessage::SubmitRegister),
            form.errors.get("password"),
        ),
        labeled_password(
            "Confirm password",
            &form.password_confirmation,
            |s| Message::Auth(AuthMessage::RegisterConfirmationChanged(s)),
            Message::Auth(AuthMessage::SubmitRegister),
            form.errors.get("password_confirmation"),
        ),
    ]
    .spacing(12);

    if let Some(error) = &form.error {
        fields = fields.push(error_text(error));
    }

    let submit = submit_button(
        "Create account",
        "Creating account...",
        form.is_submitting,
        Message::Auth(AuthMessage::SubmitRegister),
    );

    page(
        "Create your account",
        "Follow the categories, sources and authors you care about.",
        column![
            fields,
            submit,
            link("Already have an account? Sign in", Route::Login)
        ]
        .spacing(16),
    )
}

/// Password reset request screen.
pub fn view_forgot_password(form: &ForgotPasswordForm) -> Element<'_, Message> {
    let p = palette::current();

    let mut content = column![labeled_input(
        "Email",
        "you@example.com",
        &form.email,
        |s| Message::Auth(AuthMessage::ForgotEmailChanged(s)),
        form.errors.get("email"),
    )]
    .spacing(16);

    if let Some(sent) = &form.sent {
        content = content.push(text(sent.as_str()).size(13).color(p.success));
    }
    if let Some(error) = &form.error {
        content = content.push(error_text(error));
    }

    content = content
        .push(submit_button(
            "Send reset link",
            "Sending...",
            form.is_submitting,
            Message::Auth(AuthMessage::SubmitForgot),
        ))
        .push(link("Back to sign in", Route::Login));

    page(
        "Reset your password",
        "We will email you a link to choose a new one.",
        content,
    )
}

fn page<'a>(
    title: &'a str,
    subtitle: &'a str,
    body: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    let p = palette::current();
    let content = column![
        text(title).size(28).font(BOLD).color(p.text_primary),
        text(subtitle).size(14).color(p.text_secondary),
        Space::new().height(12),
        section("Account", body),
    ]
    .spacing(8)
    .padding(32)
    .max_width(440)
    .align_x(Alignment::Start);

    scrollable(container(content).center_x(Length::Fill))
        .height(Length::Fill)
        .into()
}

fn submit_button<'a>(
    label: &'a str,
    busy_label: &'a str,
    is_busy: bool,
    on_press: Message,
) -> Element<'a, Message> {
    let label = if is_busy { busy_label } else { label };
    button(text(label).size(14).font(super::common::SEMIBOLD))
        .padding([10, 20])
        .width(Length::Fill)
        .style(primary_button_style)
        .on_press_maybe((!is_busy).then_some(on_press))
        .into()
}

fn link(label: &str, route: Route) -> Element<'_, Message> {
    button(text(label).size(13))
        .padding(0)
        .style(link_button_style)
        .on_press(Message::Navigate(route))
        .into()
}
