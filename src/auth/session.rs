//! The authentication state of a request.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::auth::{UserID, cookie::get_token_from_cookies};

/// Who is making a request.
///
/// A request is only [Session::Authenticated] if it carries an auth cookie
/// with a valid, unexpired token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Authenticated(UserID),
    Anonymous,
}

impl Session {
    pub fn from_jar(jar: &PrivateCookieJar) -> Self {
        match get_token_from_cookies(jar) {
            Ok(token) => Session::Authenticated(token.user_id),
            Err(_) => Session::Anonymous,
        }
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;

        Ok(Session::from_jar(&jar))
    }
}
