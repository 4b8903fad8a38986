use std::sync::{Arc, Mutex};

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState,
    auth::{PasswordHash, UserDetails, UserID, create_user},
    balance::create_account,
    build_router,
    db::initialize,
    endpoints,
};

pub(crate) const TEST_EMAIL: &str = "ada@example.com";
pub(crate) const TEST_PASSWORD: &str = "averysafeandsecurepassword";

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Create a user that logs in with [TEST_EMAIL] and [TEST_PASSWORD], and their account.
pub(crate) fn create_test_user(connection: &Connection) -> UserID {
    create_test_user_with_email(TEST_EMAIL, connection)
}

pub(crate) fn create_test_user_with_email(email: &str, connection: &Connection) -> UserID {
    // A low cost keeps the tests fast.
    let password_hash = PasswordHash::from_raw_password(TEST_PASSWORD, &[], 4)
        .expect("Could not hash test password");
    let user = create_user(
        UserDetails::new("Ada", "Lovelace", email).expect("Invalid test user details"),
        password_hash,
        connection,
    )
    .expect("Could not create test user");
    create_account(user.id, &user.first_name, connection).expect("Could not create test account");

    user.id
}

/// A server running the whole app on `connection`, and a handle to the
/// connection for checking what the requests changed.
pub(crate) fn get_test_server(connection: Connection) -> (TestServer, Arc<Mutex<Connection>>) {
    let state = AppState::new(connection, "test secret", "Etc/UTC")
        .expect("Could not create app state");
    let db_connection = state.db_connection.clone();

    (
        TestServer::new(build_router(state)),
        db_connection,
    )
}

/// Log in as `email` through the log-in route and return the auth cookie.
pub(crate) async fn log_in(server: &TestServer, email: &str) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN)
        .form(&[("email", email), ("password", TEST_PASSWORD)])
        .await;
    response.assert_status_see_other();
    assert_eq!(response.header("location"), endpoints::DASHBOARD);

    response.cookie(crate::auth::COOKIE_TOKEN)
}
