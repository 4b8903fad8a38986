//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use axum::{
    extract::{FromRef, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState,
    auth::{Session, cookie::extend_auth_cookie_duration_if_needed},
    endpoints,
};

/// How long an auth cookie stays valid after the latest request, at least.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid authorization cookie.
///
/// Anonymous requests are redirected to the landing page before reaching the
/// route handler. Otherwise the user ID is placed into the request extensions
/// and the auth cookie is extended on the response.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(jar: PrivateCookieJar, mut request: Request, next: Next) -> Response {
    let Session::Authenticated(user_id) = Session::from_jar(&jar) else {
        return Redirect::to(endpoints::ROOT).into_response();
    };

    request.extensions_mut().insert(user_id);
    let response = next.run(request).await;

    match extend_auth_cookie_duration_if_needed(jar, SESSION_EXTENSION) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}. Keeping the old cookie.");
            response
        }
    }
}
