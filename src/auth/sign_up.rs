//! Handles sign-up requests.
//!
//! A new user gets an account with a zero balance in the same transaction
//! that creates the user, and is logged in straight away.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        PasswordHash, UserDetails, UserID,
        cookie::set_auth_cookie,
        landing::{SignUpValues, landing_view},
        user::create_user,
    },
    balance::create_account,
    capitalise_first_char, endpoints,
    form::{FormResult, accept_form},
};

/// The state needed to sign up a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignUpState> for Key {
    fn from_ref(state: &SignUpState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Create a user and their account, then log them in.
///
/// Invalid input re-renders the landing page with the values the user entered
/// and an explanation of what to fix.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    jar: PrivateCookieJar,
    form: FormResult<SignUpForm>,
) -> Response {
    let form = match accept_form(form) {
        Ok(form) => form,
        Err(error) => return error.into_response(),
    };

    let details = match UserDetails::new(&form.first_name, &form.last_name, &form.email) {
        Ok(details) => details,
        Err(error) => return render_sign_up_error(&form, error),
    };

    // Hashing is slow, so do it before taking the database lock.
    let password_hash = match PasswordHash::from_raw_password(
        &form.password,
        &[
            details.email.as_str(),
            &details.first_name,
            &details.last_name,
        ],
        state.hash_cost,
    ) {
        Ok(password_hash) => password_hash,
        Err(error) => return render_sign_up_error(&form, error),
    };

    let user_id = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match create_user_with_account(details, password_hash, &connection) {
            Ok(user_id) => user_id,
            Err(error) => return render_sign_up_error(&form, error),
        }
    };

    tracing::info!("Created user {user_id}");

    match set_auth_cookie(jar, user_id, state.cookie_duration) {
        Ok(jar) => (jar, Redirect::to(endpoints::DASHBOARD)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            error.into_response()
        }
    }
}

fn create_user_with_account(
    details: UserDetails,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<UserID, Error> {
    let transaction = connection.unchecked_transaction()?;
    let user = create_user(details, password_hash, &transaction)?;
    create_account(user.id, &user.first_name, &transaction)?;
    transaction.commit()?;

    Ok(user.id)
}

fn render_sign_up_error(form: &SignUpForm, error: Error) -> Response {
    let status = match error {
        Error::DuplicateEmail => StatusCode::CONFLICT,
        Error::TooWeak(_) | Error::InvalidEmail(_) | Error::EmptyName(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        error => return error.into_response(),
    };

    let message = capitalise_first_char(&error.to_string());
    let values = SignUpValues {
        first_name: &form.first_name,
        last_name: &form.last_name,
        email: &form.email,
        error_message: Some(&message),
    };

    (status, landing_view(None, &values)).into_response()
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        app_state::create_cookie_key,
        auth::{
            DEFAULT_COOKIE_DURATION, cookie::COOKIE_TOKEN, parse_email, user::get_user_by_email,
        },
        balance::get_balance,
        db::initialize,
        endpoints,
        test_utils::must_get_form_by_id,
    };

    use super::{SignUpForm, SignUpState, post_sign_up};

    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));

        let state = SignUpState {
            cookie_key: create_cookie_key("foobar"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            hash_cost: 4,
            db_connection: db_connection.clone(),
        };
        let app = Router::new()
            .route(endpoints::SIGN_UP, post(post_sign_up))
            .with_state(state);

        (
            TestServer::new(app),
            db_connection,
        )
    }

    fn form(email: &str, password: &str) -> SignUpForm {
        SignUpForm {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[tokio::test]
    async fn sign_up_creates_user_with_empty_account() {
        let (server, db_connection) = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&form("Ada@Example.com", "averysafeandsecurepassword"))
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::DASHBOARD);
        let _ = response.cookie(COOKIE_TOKEN);

        let connection = db_connection.lock().unwrap();
        let user =
            get_user_by_email(&parse_email("ada@example.com").unwrap(), &connection).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(get_balance(user.id, &connection), Ok(0.0));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (server, _) = get_test_server();
        server
            .post(endpoints::SIGN_UP)
            .form(&form("ada@example.com", "averysafeandsecurepassword"))
            .await
            .assert_status_see_other();

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&form("ada@example.com", "anotherverysafepassword"))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
    }

    #[tokio::test]
    async fn weak_password_redisplays_form_with_values() {
        let (server, db_connection) = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&form("ada@example.com", "password"))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let html = scraper::Html::parse_document(&response.text());
        let sign_up_form = must_get_form_by_id(&html, "sign-up-form");
        let email_input = sign_up_form
            .select(&scraper::Selector::parse("input[name=email]").unwrap())
            .next()
            .expect("No email input");
        assert_eq!(email_input.value().attr("value"), Some("ada@example.com"));

        let connection = db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM user", (), |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn invalid_email_is_unprocessable() {
        let (server, _) = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&form("not-an-email", "averysafeandsecurepassword"))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_field_gets_error_page() {
        let (server, db_connection) = get_test_server();

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&[
                ("first_name", "Ada"),
                ("last_name", "Lovelace"),
                ("email", "ada@example.com"),
            ])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            response
                .header("content-type")
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );

        let connection = db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM user", (), |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
