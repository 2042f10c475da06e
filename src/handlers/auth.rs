use crate::middleware::SessionState;
use crate::{GatehouseError, router::AppState, views};
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// GET / -> login page, or the dashboard when already signed in.
pub async fn index(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    match state.sessions.current(&jar) {
        SessionState::Authenticated(_) => Redirect::to("/dashboard").into_response(),
        SessionState::Anonymous => Html(views::render_index(None)).into_response(),
    }
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, GatehouseError> {
    match state
        .accounts
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(account) => {
            info!(username = %account.username, "login succeeded");
            let jar = state.sessions.establish(jar, &account.username);
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(GatehouseError::AuthenticationFailed) => {
            warn!(username = %form.username, "login failed");
            let msg = GatehouseError::AuthenticationFailed.to_string();
            Ok(Html(views::render_index(Some(&msg))).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /register
pub async fn register_page() -> Html<String> {
    Html(views::render_register(None))
}

/// POST /register -> back to the login page on success.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, GatehouseError> {
    match state
        .accounts
        .register(
            &form.email,
            &form.username,
            &form.password,
            &form.confirm_password,
        )
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(e @ (GatehouseError::Validation(_) | GatehouseError::Conflict)) => {
            Ok(Html(views::render_register(Some(&e.to_string()))).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: PrivateCookieJar) -> impl IntoResponse {
    (state.sessions.clear(jar), Redirect::to("/"))
}
