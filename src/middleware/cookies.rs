use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub fn build_cookie(
    name: &'static str,
    value: String,
    secure: bool,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut builder = Cookie::build(Cookie::new(name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax);
    if let Some(age) = max_age {
        builder = builder.max_age(age);
    }
    builder.build()
}

pub fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
