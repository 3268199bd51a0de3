use std::time::Duration;

use jsonwebtoken::Algorithm;

/// How bearer tokens are checked. Tokens are minted by the identity service
/// with the same shared secret; the room service only mints them in tests.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    /// Pinned; tokens signed with anything else are rejected.
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    /// Clock skew tolerated on `exp`.
    pub leeway: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::from_secs(15 * 60),
            leeway: Duration::from_secs(60),
        }
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"werewolf_dev_secret_not_for_production".to_vec())
    }
}
