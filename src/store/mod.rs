//! In-memory shopper sessions
//!
//! Each browser gets an opaque random token in a cookie. The store keeps
//! only the SHA-256 hash of that token, mapped to the shopper's cart and
//! configuration in progress. Idle sessions expire and are purged lazily
//! when new sessions are created.

use crate::cart::Cart;
use crate::session::ConfigurationSession;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Everything the server remembers about one shopper
#[derive(Debug)]
pub struct ShopperSession {
    pub cart: Cart,
    pub configuring: Option<ConfigurationSession>,
    /// Set while an order from this session is being delivered
    pub submitting: bool,
    last_seen: DateTime<Utc>,
}

impl ShopperSession {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            cart: Cart::new(),
            configuring: None,
            submitting: false,
            last_seen: now,
        }
    }
}

/// Result of a store access; `new_token` is set when a session was created
/// and the client must be handed a fresh cookie
#[derive(Debug)]
pub struct Access<R> {
    pub value: R,
    pub new_token: Option<String>,
}

const MAX_EXPIRY_HOURS: u64 = 24 * 365;

pub struct ShopperStore {
    sessions: Mutex<HashMap<String, ShopperSession>>,
    expiry: Duration,
}

impl ShopperStore {
    pub fn new(expiry_hours: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            expiry: Duration::hours(expiry_hours.clamp(1, MAX_EXPIRY_HOURS) as i64),
        }
    }

    /// Seconds a session lives without activity, for the cookie Max-Age
    pub fn expiry_secs(&self) -> i64 {
        self.expiry.num_seconds()
    }

    /// Run `f` on the session identified by `token`, creating a new session
    /// when the token is missing, unknown or expired.
    pub async fn with_session<R>(
        &self,
        token: Option<&str>,
        f: impl FnOnce(&mut ShopperSession) -> R,
    ) -> Access<R> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;

        if let Some(token) = token {
            let key = hash_token(token);
            if let Some(session) = sessions.get_mut(&key) {
                if now - session.last_seen <= self.expiry {
                    session.last_seen = now;
                    return Access {
                        value: f(session),
                        new_token: None,
                    };
                }
                sessions.remove(&key);
                tracing::debug!("Shopper session expired");
            }
        }

        let purged = purge_expired(&mut sessions, now, self.expiry);
        if purged > 0 {
            tracing::info!(purged, remaining = sessions.len(), "Purged idle shopper sessions");
        }

        let token = generate_session_token();
        let session = sessions
            .entry(hash_token(&token))
            .or_insert_with(|| ShopperSession::new(now));
        Access {
            value: f(session),
            new_token: Some(token),
        }
    }

    /// Run `f` on an existing, unexpired session only
    pub async fn with_existing<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut ShopperSession) -> R,
    ) -> Option<R> {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&hash_token(token))?;
        if now - session.last_seen > self.expiry {
            return None;
        }
        session.last_seen = now;
        Some(f(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn purge_expired(
    sessions: &mut HashMap<String, ShopperSession>,
    now: DateTime<Utc>,
    expiry: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| now - session.last_seen <= expiry);
    before - sessions.len()
}

// =============================================================================
// Helper Functions
// =============================================================================

pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token_is_sha256() {
        let hash = hash_token("test-shopper-token");
        // SHA-256 produces 64-character hex string
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_token("test-shopper-token"));
    }

    #[test]
    fn test_generate_session_token() {
        let token = generate_session_token();
        // 32 random bytes = 64 hex chars
        assert_eq!(token.len(), 64);
        assert_ne!(token, generate_session_token());
    }

    #[tokio::test]
    async fn test_new_session_issues_token() {
        let store = ShopperStore::new(24);
        let access = store.with_session(None, |s| s.cart.len()).await;
        assert_eq!(access.value, 0);
        let token = access.new_token.unwrap();

        let again = store.with_session(Some(&token), |_| ()).await;
        assert!(again.new_token.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_gets_fresh_session() {
        let store = ShopperStore::new(24);
        let access = store.with_session(Some("forged"), |_| ()).await;
        assert!(access.new_token.is_some());
        assert!(store.with_existing("forged", |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = ShopperStore::new(24);
        let a = store
            .with_session(None, |s| s.submitting = true)
            .await
            .new_token
            .unwrap();
        let b = store.with_session(None, |_| ()).await.new_token.unwrap();

        assert_eq!(store.with_existing(&a, |s| s.submitting).await, Some(true));
        assert_eq!(store.with_existing(&b, |s| s.submitting).await, Some(false));
    }

    #[tokio::test]
    async fn test_expired_sessions_are_purged() {
        let store = ShopperStore::new(1);
        let stale = store.with_session(None, |_| ()).await.new_token.unwrap();
        {
            let mut sessions = store.sessions.lock().await;
            for session in sessions.values_mut() {
                session.last_seen = Utc::now() - Duration::hours(2);
            }
        }

        assert!(store.with_existing(&stale, |_| ()).await.is_none());
        let access = store.with_session(Some(&stale), |_| ()).await;
        assert!(access.new_token.is_some());
        assert_eq!(store.len().await, 1);
    }
}
