//! Cookie-backed login sessions.
//!
//! The session is a private (encrypted + authenticated) cookie holding the
//! username. A missing cookie, or one that fails to decrypt, is an anonymous
//! session. There is no expiry, rotation or server-side revocation.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;

use super::cookies::{build_cookie, clear_cookie};
use crate::router::AppState;

pub const SESSION_COOKIE: &str = "gatehouse_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(String),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionManager {
    secure: bool,
}

impl SessionManager {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn current(&self, jar: &PrivateCookieJar) -> SessionState {
        match jar.get(SESSION_COOKIE) {
            Some(c) if !c.value().is_empty() => SessionState::Authenticated(c.value().to_owned()),
            _ => SessionState::Anonymous,
        }
    }

    /// Anonymous -> Authenticated(username).
    pub fn establish(&self, jar: PrivateCookieJar, username: &str) -> PrivateCookieJar {
        jar.add(build_cookie(
            SESSION_COOKIE,
            username.to_string(),
            self.secure,
            None,
        ))
    }

    /// Authenticated -> Anonymous.
    pub fn clear(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(clear_cookie(SESSION_COOKIE))
    }
}

/// Guard for protected routes. Anonymous requests are redirected to `/`
/// before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.key.clone());
        match state.sessions.current(&jar) {
            SessionState::Authenticated(username) => Ok(Self(username)),
            SessionState::Anonymous => Err(Redirect::to("/").into_response()),
        }
    }
}
