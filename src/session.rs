use std::collections::HashMap;

use axum_extra::extract::cookie::CookieJar;
use cookie::{Cookie, SameSite};
use jiff::{Timestamp, ToSpan};
use tokio::sync::RwLock;

pub const COOKIE_NAME: &str = "cinemapulse_session";

/// Ten years. `SESSION_TTL_HOURS` is clamped to this before any expiry math.
const MAX_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user_email: Option<String>,
    pub admin: bool,
}

struct Entry {
    session: Session,
    expires_at: Timestamp,
}

/// Server-side sessions keyed by a random token held in a cookie.
pub struct SessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    ttl_hours: i64,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_hours: ttl_hours.clamp(1, MAX_TTL_HOURS),
        }
    }

    /// The session the request's cookie points at, or an empty one.
    pub async fn current(&self, jar: &CookieJar) -> Session {
        let Some(token) = jar.get(COOKIE_NAME).map(|c| c.value().to_string()) else {
            return Session::default();
        };
        let now = Timestamp::now();
        let entries = self.entries.read().await;
        match entries.get(&token) {
            Some(entry) if entry.expires_at > now => entry.session.clone(),
            _ => Session::default(),
        }
    }

    /// Applies `update` to the request's session, creating one when needed,
    /// and returns the jar carrying its cookie.
    pub async fn update(&self, jar: CookieJar, update: impl FnOnce(&mut Session)) -> CookieJar {
        let now = Timestamp::now();
        let expires_at = now + self.ttl_hours.hours();
        let existing = jar.get(COOKIE_NAME).map(|c| c.value().to_string());

        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);

        let token = match existing {
            Some(token) if entries.contains_key(&token) => token,
            _ => uuid::Uuid::new_v4().simple().to_string(),
        };
        let entry = entries
            .entry(token.clone())
            .or_insert_with(|| Entry { session: Session::default(), expires_at });
        entry.expires_at = expires_at;
        update(&mut entry.session);

        jar.add(
            Cookie::build((COOKIE_NAME, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::hours(self.ttl_hours)),
        )
    }

    /// Drops the session entirely.
    pub async fn clear(&self, jar: CookieJar) -> CookieJar {
        if let Some(token) = jar.get(COOKIE_NAME).map(|c| c.value().to_string()) {
            self.entries.write().await.remove(&token);
        }
        jar.remove(Cookie::build(COOKIE_NAME).path("/"))
    }
}
