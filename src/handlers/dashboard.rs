use crate::middleware::{AuthenticatedUser, Flash, flash};
use crate::{GatehouseError, router::AppState, views};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::warn;

const CONFLICT_MESSAGE: &str = "Username or email already registered";

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    pub username: String,
    pub email: String,
    /// Empty keeps the current password.
    #[serde(default)]
    pub password: String,
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(username): AuthenticatedUser,
    jar: PrivateCookieJar,
) -> Result<Response, GatehouseError> {
    let records = state.records.list().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Html(views::render_dashboard(&username, &records, &flashes)),
    )
        .into_response())
}

/// POST /create_user
pub async fn create_user(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    jar: PrivateCookieJar,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, GatehouseError> {
    let notice = match state
        .records
        .create(&form.email, &form.username, &form.password)
        .await
    {
        Ok(_) => Flash::success("User created successfully"),
        Err(GatehouseError::Conflict) => {
            warn!(%actor, username = %form.username, "create rejected: username or email taken");
            Flash::error(CONFLICT_MESSAGE)
        }
        Err(GatehouseError::Validation(msg)) => Flash::error(msg),
        Err(e) => return Err(e),
    };
    Ok(back_to_dashboard(&state, jar, notice))
}

/// POST /edit_user/{id}
pub async fn edit_user(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
    Form(form): Form<EditUserForm>,
) -> Result<Response, GatehouseError> {
    let notice = match state
        .records
        .update(id, &form.email, &form.username, &form.password)
        .await
    {
        Ok(()) => Flash::success("User updated successfully"),
        Err(GatehouseError::Conflict) => {
            warn!(%actor, id, "edit rejected: username or email taken");
            Flash::error(CONFLICT_MESSAGE)
        }
        Err(GatehouseError::Validation(msg)) => Flash::error(msg),
        Err(e) => return Err(e),
    };
    Ok(back_to_dashboard(&state, jar, notice))
}

/// POST /delete_user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    Path(id): Path<i64>,
    jar: PrivateCookieJar,
) -> Result<Response, GatehouseError> {
    state.records.delete(id).await?;
    Ok(back_to_dashboard(
        &state,
        jar,
        Flash::success("User deleted successfully"),
    ))
}

fn back_to_dashboard(state: &AppState, jar: PrivateCookieJar, notice: Flash) -> Response {
    let jar = flash::push(jar, notice, state.sessions.secure());
    (jar, Redirect::to("/dashboard")).into_response()
}
