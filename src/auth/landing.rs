//! The landing page, which holds the log-in and sign-up forms.

use axum::{
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    auth::Session,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, ERROR_MESSAGE_STYLE, FORM_LABEL_STYLE, base, form_card,
        password_input, text_input,
    },
};

/// The minimum number of characters a new password should have on the client side.
///
/// The server checks the password strength on top of this.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

/// The query string of the landing page.
#[derive(Debug, Default, Deserialize)]
pub struct LandingQuery {
    /// Set to "credentials" after a failed log-in attempt.
    pub error: Option<String>,
}

/// The values to fill the sign-up form with when it is shown again.
#[derive(Debug, Default)]
pub struct SignUpValues<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub error_message: Option<&'a str>,
}

/// Display the landing page, or send signed-in users to their dashboard.
pub async fn get_landing_page(session: Session, Query(query): Query<LandingQuery>) -> Response {
    if let Session::Authenticated(_) = session {
        return Redirect::to(endpoints::DASHBOARD).into_response();
    }

    let log_in_error = match query.error.as_deref() {
        Some("credentials") => Some(INVALID_CREDENTIALS_ERROR_MSG),
        Some(other) => {
            tracing::warn!("Unknown landing page error code {other:?}");
            None
        }
        None => None,
    };

    landing_view(log_in_error, &SignUpValues::default()).into_response()
}

pub fn landing_view(log_in_error: Option<&str>, sign_up: &SignUpValues) -> Markup {
    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto gap-6"
        {
            a href=(endpoints::ROOT) class="flex items-center text-2xl font-semibold text-gray-900 dark:text-white"
            {
                img class="w-8 h-8 mr-2" src="/static/favicon-32x32.png" alt="logo";
                "Fintrack"
            }

            (form_card("Log in to your account", &log_in_form(log_in_error)))
            (form_card("Create an account", &sign_up_form(sign_up)))
        }
    };

    base("Welcome", &[], &content)
}

fn log_in_form(error_message: Option<&str>) -> Markup {
    html! {
        form
            id="log-in-form"
            method="post"
            action=(endpoints::LOG_IN)
            class="space-y-4 md:space-y-6"
        {
            (text_input("log-in-email", "Email", "email", "email", ""))
            (password_input("log-in-password", 0))

            @if let Some(error_message) = error_message
            {
                p class=(ERROR_MESSAGE_STYLE) { (error_message) }
            }

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="rounded-xs";

                label for="remember_me" class=(FORM_LABEL_STYLE)
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
        }
    }
}

fn sign_up_form(values: &SignUpValues) -> Markup {
    html! {
        form
            id="sign-up-form"
            method="post"
            action=(endpoints::SIGN_UP)
            class="space-y-4 md:space-y-6"
        {
            (text_input("first-name", "First name", "first_name", "text", values.first_name))
            (text_input("last-name", "Last name", "last_name", "text", values.last_name))
            (text_input("sign-up-email", "Email", "email", "email", values.email))
            (password_input("sign-up-password", PASSWORD_INPUT_MIN_LENGTH))

            @if let Some(error_message) = values.error_message
            {
                p class=(ERROR_MESSAGE_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Sign up" }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::Query,
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;

    use crate::{
        auth::{Session, UserID},
        endpoints,
        test_utils::{
            assert_form_input, assert_valid_html, get_header, must_get_form_by_id,
            parse_html_document,
        },
    };

    use super::{INVALID_CREDENTIALS_ERROR_MSG, LandingQuery, get_landing_page};

    #[tokio::test]
    async fn anonymous_user_sees_both_forms() {
        let response = get_landing_page(Session::Anonymous, Query(LandingQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let log_in_form = must_get_form_by_id(&html, "log-in-form");
        assert_eq!(log_in_form.value().attr("action"), Some(endpoints::LOG_IN));
        assert_form_input(&log_in_form, "email", "email");
        assert_form_input(&log_in_form, "password", "password");

        let sign_up_form = must_get_form_by_id(&html, "sign-up-form");
        assert_eq!(sign_up_form.value().attr("action"), Some(endpoints::SIGN_UP));
        assert_form_input(&sign_up_form, "first_name", "text");
        assert_form_input(&sign_up_form, "last_name", "text");
        assert_form_input(&sign_up_form, "email", "email");
        assert_form_input(&sign_up_form, "password", "password");
    }

    #[tokio::test]
    async fn failed_log_in_shows_generic_message() {
        let query = LandingQuery {
            error: Some("credentials".to_owned()),
        };

        let response = get_landing_page(Session::Anonymous, Query(query)).await;

        let html = parse_html_document(response).await;
        let log_in_form = must_get_form_by_id(&html, "log-in-form");
        let message = log_in_form
            .select(&Selector::parse("p").unwrap())
            .next()
            .expect("No error message found")
            .text()
            .collect::<String>();
        assert_eq!(message.trim(), INVALID_CREDENTIALS_ERROR_MSG);
    }

    #[tokio::test]
    async fn authenticated_user_is_sent_to_dashboard() {
        let response = get_landing_page(
            Session::Authenticated(UserID::new(1)),
            Query(LandingQuery::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::DASHBOARD);
    }
}
