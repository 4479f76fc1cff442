use chrono::{DateTime, Duration, Utc};
use hubshift_core_types::Sensitive;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A signed-in session. Only the SHA-256 digest of the bearer token is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a session for `user_id`, returning the record and the raw token
    /// to hand to the client
    pub fn issue(user_id: Uuid, ttl: Duration) -> (Self, Sensitive<String>) {
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let now = Utc::now();
        let session = Self {
            token_hash: hash_token(&token),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        };
        (session, Sensitive::new(token))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Hex SHA-256 of a raw session token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_stores_only_hash() {
        let user_id = Uuid::now_v7();
        let (session, token) = Session::issue(user_id, Duration::hours(1));

        assert_eq!(token.expose().len(), 64);
        assert_ne!(&session.token_hash, token.expose());
        assert_eq!(session.token_hash, hash_token(token.expose()));
        assert_eq!(session.user_id, user_id);
    }

    #[test]
    fn test_expiry_boundary() {
        let (session, _) = Session::issue(Uuid::now_v7(), Duration::minutes(30));
        assert!(!session.is_expired(session.created_at));
        assert!(session.is_expired(session.expires_at));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (_, t1) = Session::issue(Uuid::now_v7(), Duration::hours(1));
        let (_, t2) = Session::issue(Uuid::now_v7(), Duration::hours(1));
        assert_ne!(t1.expose(), t2.expose());
    }
}
