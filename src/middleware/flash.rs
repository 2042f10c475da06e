//! One-shot status messages carried across a redirect in a private cookie.

use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::warn;

use super::cookies::{build_cookie, clear_cookie};

pub const FLASH_COOKIE: &str = "gatehouse_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

fn read(jar: &PrivateCookieJar) -> Vec<Flash> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    serde_json::from_str(cookie.value())
        .inspect_err(|e| warn!(error = %e, "discarding unreadable flash cookie"))
        .unwrap_or_default()
}

/// Queue a message for the next rendered page.
pub fn push(jar: PrivateCookieJar, flash: Flash, secure: bool) -> PrivateCookieJar {
    let mut pending = read(&jar);
    pending.push(flash);
    match serde_json::to_string(&pending) {
        Ok(value) => jar.add(build_cookie(
            FLASH_COOKIE,
            value,
            secure,
            Some(Duration::minutes(5)),
        )),
        Err(e) => {
            warn!(error = %e, "failed to encode flash messages");
            jar
        }
    }
}

/// Drain pending messages; they are shown once.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    let pending = read(&jar);
    if pending.is_empty() {
        return (jar, pending);
    }
    (jar.remove(clear_cookie(FLASH_COOKIE)), pending)
}
