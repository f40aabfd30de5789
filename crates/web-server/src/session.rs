use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "lightbnb_session";

/// Maps opaque session ids to the id of the logged-in user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session for `user_id` and returns its id.
    async fn create(&self, user_id: i32) -> String;
    async fn user_id(&self, session_id: &str) -> Option<i32>;
    async fn destroy(&self, session_id: &str);
}

/// Process-local session storage. Sessions are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, i32>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i32) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), user_id);
        session_id
    }

    async fn user_id(&self, session_id: &str) -> Option<i32> {
        self.sessions.read().await.get(session_id).copied()
    }

    async fn destroy(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }
}

pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

pub fn with_session(jar: CookieJar, session_id: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

pub fn without_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sessions_resolve_until_destroyed() {
        let store = MemorySessionStore::new();
        let first = store.create(1).await;
        let second = store.create(2).await;
        assert_ne!(first, second);

        assert_eq!(store.user_id(&first).await, Some(1));
        assert_eq!(store.user_id(&second).await, Some(2));

        store.destroy(&first).await;
        assert_eq!(store.user_id(&first).await, None);
        assert_eq!(store.user_id(&second).await, Some(2));
    }

    #[test]
    fn cookie_round_trips_through_the_jar() {
        let jar = with_session(CookieJar::new(), "abc".to_string());
        assert_eq!(session_id(&jar).as_deref(), Some("abc"));

        let jar = without_session(jar);
        assert_eq!(session_id(&jar), None);
    }
}
