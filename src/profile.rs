//! The profile page shows who the user is and how much money they have.
//!
//! The form for changing the user's name and email is shared with the settings page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{User, UserDetails, UserID, get_user_by_id, update_user_details},
    balance::{Account, get_account},
    endpoints,
    form::{FormResult, accept_form},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_ROW_STYLE, base,
        format_currency, text_input,
    },
    navigation::NavBar,
};

/// The state needed for viewing and changing a user's details.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw values submitted by the profile form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let (user, account) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_user_by_id(user_id, &connection)?,
            get_account(user_id, &connection)?,
        )
    };

    Ok(profile_view(&user, &account).into_response())
}

pub async fn post_profile(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    form: FormResult<ProfileForm>,
) -> Result<Response, Error> {
    update_profile(&state, user_id, &accept_form(form)?)
}

/// Validate and save the user's new details, then send them to their profile.
///
/// # Errors
///
/// Returns a validation error for blank names or a bad email address, or
/// [Error::DuplicateEmail] if another user has the email.
pub(crate) fn update_profile(
    state: &ProfileState,
    user_id: UserID,
    form: &ProfileForm,
) -> Result<Response, Error> {
    let details = UserDetails::new(&form.first_name, &form.last_name, &form.email)
        .inspect_err(|error| tracing::warn!("rejected details for user {user_id}: {error}"))?;

    {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        update_user_details(user_id, &details, &connection)?;
    }

    tracing::info!("Updated details of user {user_id}");

    Ok(Redirect::to(endpoints::PROFILE).into_response())
}

/// The form for changing the user's name and email, posting to `action`.
pub(crate) fn profile_form(action: &str, user: &User) -> Markup {
    html! {
        form
            id="profile-form"
            method="post"
            action=(action)
            class="w-full space-y-4"
        {
            (text_input("first-name", "First name", "first_name", "text", &user.first_name))
            (text_input("last-name", "Last name", "last_name", "text", &user.last_name))
            (text_input("email", "Email", "email", "email", user.email.as_str()))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}

fn profile_view(user: &User, account: &Account) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILE).into_html();

    let content = html!(
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-4" { (user.first_name) " " (user.last_name) }

            table class="w-full mb-6 text-sm text-left text-gray-500 dark:text-gray-400"
            {
                tbody
                {
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Email" }
                        td id="profile-email" class=(TABLE_CELL_STYLE) { (user.email) }
                    }
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { (account.name) }
                        td class=(TABLE_CELL_STYLE) { (account.details) }
                    }
                    tr class=(TABLE_ROW_STYLE)
                    {
                        th scope="row" class=(TABLE_CELL_STYLE) { "Balance" }
                        td id="balance" class=(TABLE_CELL_STYLE) { (format_currency(account.balance)) }
                    }
                }
            }

            h2 class="text-xl font-semibold mb-4 self-start" { "Your details" }

            (profile_form(endpoints::PROFILE, user))
        }
    );

    base("Profile", &[], &content)
}

#[cfg(test)]
mod profile_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use scraper::Selector;
    use std::sync::{Arc, Mutex};

    use crate::{
        auth::get_user_by_id,
        endpoints,
        ledger::{CategoryName, Ledger, NewRecord, RecordKind},
        test_utils::{
            assert_form_action, assert_form_input_with_value, assert_redirect, assert_valid_html,
            create_test_user, create_test_user_with_email, get_test_connection, must_get_form_by_id,
            parse_html_document,
        },
    };

    use super::{ProfileForm, ProfileState, get_profile_page, post_profile};

    fn form(first_name: &str, last_name: &str, email: &str) -> ProfileForm {
        ProfileForm {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
        }
    }

    #[tokio::test]
    async fn shows_details_and_balance() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        {
            let ledger = Ledger::new(&connection, user_id);
            let salary = ledger
                .add_category(RecordKind::Income, CategoryName::new_unchecked("Salary"))
                .unwrap();
            ledger
                .create_record(
                    RecordKind::Income,
                    &NewRecord::new("Pay day", salary.id, 34.5, time::macros::date!(2025 - 10 - 01), None)
                        .unwrap(),
                )
                .unwrap();
        }
        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_profile_page(State(state), Extension(user_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let balance = html
            .select(&Selector::parse("#balance").unwrap())
            .next()
            .expect("No balance cell")
            .text()
            .collect::<String>();
        assert_eq!(balance.trim(), "$34.50");

        let form = must_get_form_by_id(&html, "profile-form");
        assert_form_action(&form, endpoints::PROFILE);
        assert_form_input_with_value(&form, "first_name", "text", "Ada");
        assert_form_input_with_value(&form, "email", "email", "ada@example.com");
    }

    #[tokio::test]
    async fn updates_details() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = post_profile(
            State(state.clone()),
            Extension(user_id),
            Ok(Form(form(" Augusta ", "King", "Augusta@Example.com"))),
        )
        .await
        .unwrap();

        assert_redirect(&response, endpoints::PROFILE);
        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_id(user_id, &connection).unwrap();
        assert_eq!(user.first_name, "Augusta");
        assert_eq!(user.last_name, "King");
        assert_eq!(user.email.as_str(), "augusta@example.com");
    }

    #[tokio::test]
    async fn rejects_email_of_another_user() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        create_test_user_with_email("grace@example.com", &connection);
        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = post_profile(
            State(state),
            Extension(user_id),
            Ok(Form(form("Ada", "Lovelace", "grace@example.com"))),
        )
        .await;

        assert_eq!(result.unwrap_err(), crate::Error::DuplicateEmail);
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection);
        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = post_profile(
            State(state),
            Extension(user_id),
            Ok(Form(form("  ", "Lovelace", "ada@example.com"))),
        )
        .await;

        assert_eq!(result.unwrap_err(), crate::Error::EmptyName("First name"));
    }
}
