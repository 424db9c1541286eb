// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted cookie store shared with the credentialed HTTP client.
//!
//! Plays the role of the browser's cookie jar: the backend sets the session
//! cookies on credentialed responses, the auth layer polls a snapshot, and
//! logout overwrites them with an expired date. Cookies are keyed by name
//! only, since every credentialed request targets the one configured backend
//! origin.

use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;

use crate::error::AppError;

/// `"true"` while the backend considers the browser logged in.
pub const AUTHENTICATED_COOKIE: &str = "authenticated";
/// Strava athlete ID of the logged-in user.
pub const USER_ID_COOKIE: &str = "userId";
/// Opaque backend session handle.
pub const SESSION_ID_COOKIE: &str = "sessionId";

/// Every cookie the client clears on logout.
pub const SESSION_COOKIES: [&str; 3] = [AUTHENTICATED_COOKIE, USER_ID_COOKIE, SESSION_ID_COOKIE];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Cookie jar for the backend origin, optionally persisted to a JSON file.
#[derive(Debug, Default)]
pub struct SessionCookies {
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
    path: Option<PathBuf>,
}

impl SessionCookies {
    /// A jar that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the jar persisted at `path`, starting empty if the file is absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let cookies = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                AppError::Storage(format!("Corrupt cookie store {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read cookie store {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            cookies: Mutex::new(cookies),
            path: Some(path),
        })
    }

    /// Current unexpired cookies, the equivalent of reading `document.cookie`.
    pub fn snapshot(&self) -> CookieSnapshot {
        let now = Utc::now();
        let cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        CookieSnapshot {
            values: cookies
                .iter()
                .filter(|(_, c)| c.is_live(now))
                .map(|(name, c)| (name.clone(), c.value.clone()))
                .collect(),
        }
    }

    /// Apply one `Set-Cookie`-style string, e.g.
    /// `authenticated=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/`.
    ///
    /// Expired cookies are removed from the jar.
    pub fn set_cookie_str(&self, raw: &str) {
        self.apply(std::iter::once(raw));
    }

    /// Overwrite `name` with an already-expired value.
    pub fn expire(&self, name: &str) {
        self.set_cookie_str(&format!(
            "{}=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/",
            name
        ));
    }

    fn apply<'a>(&self, raw_cookies: impl Iterator<Item = &'a str>) {
        let now = Utc::now();
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        let mut changed = false;

        for raw in raw_cookies {
            let cookie = match Cookie::parse(raw) {
                Ok(cookie) => cookie,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed Set-Cookie header");
                    continue;
                }
            };

            let expires_at = expiry_of(&cookie, now);
            if expires_at.is_some_and(|at| at <= now) {
                changed |= cookies.remove(cookie.name()).is_some();
                tracing::debug!(name = cookie.name(), "Cookie expired");
                continue;
            }

            cookies.insert(
                cookie.name().to_string(),
                StoredCookie {
                    value: cookie.value().to_string(),
                    expires_at,
                },
            );
            tracing::debug!(name = cookie.name(), "Cookie stored");
            changed = true;
        }

        if changed {
            self.persist(&cookies);
        }
    }

    fn persist(&self, cookies: &BTreeMap<String, StoredCookie>) {
        let Some(path) = &self.path else {
            return;
        };

        if let Err(e) = write_json(path, cookies) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist cookie store");
        }
    }
}

/// Absolute expiry of a parsed cookie. `Max-Age` wins over `Expires`.
///
/// A `Max-Age` too large to represent means the cookie never expires.
fn expiry_of(cookie: &Cookie<'_>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if let Some(max_age) = cookie.max_age() {
        return Duration::try_seconds(max_age.whole_seconds())
            .and_then(|delta| now.checked_add_signed(delta));
    }

    cookie.expires_datetime().and_then(to_chrono)
}

fn to_chrono(at: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(at.unix_timestamp(), at.nanosecond())
}

/// Write `value` as JSON next to `path`, then rename it into place so a
/// crash never leaves a truncated file behind.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(value)?;
    let tmp = temp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl reqwest::cookie::CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &reqwest::Url) {
        tracing::debug!(origin = %url.origin().ascii_serialization(), "Received Set-Cookie headers");
        self.apply(cookie_headers.filter_map(|value| value.to_str().ok()));
    }

    fn cookies(&self, _url: &reqwest::Url) -> Option<HeaderValue> {
        let header = self.snapshot().to_header();
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header).ok()
    }
}

/// Point-in-time view of the cookies, as `name -> value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSnapshot {
    values: BTreeMap<String, String>,
}

impl CookieSnapshot {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The `userId` cookie, if present and non-empty.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_COOKIE).filter(|id| !id.is_empty())
    }

    /// Cookie evidence of a session: `authenticated=true` plus a `userId`.
    pub fn has_session_evidence(&self) -> bool {
        self.get(AUTHENTICATED_COOKIE) == Some("true") && self.user_id().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize back into a `Cookie` request header value.
    pub fn to_header(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
