use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{event, Level};

use super::{decrypt_on, encrypt_on, ReplayCache, StateError};
use crate::core::types::{ClientId, StateNonce, StateToken};
use crate::util::clock::{Clock, SystemClock};
use crate::util::random::FromRandom;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const MAX_CLOCK_SKEW_SECS: i64 = 30;

/// Payload encrypted into every state token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StateClaims {
    #[serde(rename = "cid")]
    pub client_id: ClientId,
    pub iat: i64,
    pub jti: StateNonce,
}

/// Issues and redeems single-use state tokens bound to a client.
///
/// A token is accepted only if it decrypts under the current day's key, was
/// issued no longer than `ttl` ago, and its nonce has not been redeemed yet.
pub struct StateService {
    secret: String,
    ttl_secs: i64,
    replay: ReplayCache,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for StateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateService {{ ttl_secs: {}, ... }}", self.ttl_secs)
    }
}

impl StateService {
    pub const DEFAULT_TTL: StdDuration = StdDuration::from_secs(10 * 60);

    pub fn new(secret: String, ttl: StdDuration) -> Self {
        Self::with_clock(secret, ttl, Arc::new(SystemClock))
    }

    /// `ttl` is capped at one day; keys rotate daily regardless.
    pub fn with_clock(secret: String, ttl: StdDuration, clock: Arc<dyn Clock>) -> Self {
        let ttl_secs = ttl.as_secs().min(SECONDS_PER_DAY) as i64;
        Self {
            secret,
            ttl_secs,
            replay: ReplayCache::new(),
            clock,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn issue(&self, client_id: &ClientId) -> Result<StateToken, StateError> {
        let now = self.clock.now();
        let claims = StateClaims {
            client_id: client_id.clone(),
            iat: now.timestamp(),
            jti: StateNonce::from_random(),
        };

        let payload = serde_json::to_string(&claims)?;
        let token = encrypt_on(&payload, &self.secret, now.date_naive())?;

        event!(Level::DEBUG, jti = %claims.jti.0, "Issuing state");
        Ok(StateToken(token))
    }

    /// Decrypts a token without checking its age or consuming it.
    pub fn inspect(&self, token: &StateToken) -> Result<StateClaims, StateError> {
        self.claims_at(token, self.clock.now())
    }

    #[tracing::instrument(skip_all)]
    pub fn verify(&self, token: &StateToken) -> Result<ClientId, StateError> {
        let now = self.clock.now();
        let claims = self.claims_at(token, now)?;

        let age = now.timestamp() - claims.iat;
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(StateError::NotYetValid);
        }
        if age > self.ttl_secs {
            return Err(StateError::Expired);
        }

        let expires_at = now + Duration::seconds(self.ttl_secs - age);
        if !self.replay.consume(&claims.jti, expires_at, now) {
            return Err(StateError::Replayed);
        }

        event!(Level::DEBUG, jti = %claims.jti.0, client_id = %claims.client_id, "Redeemed state");
        Ok(claims.client_id)
    }

    pub fn purge_replay_cache(&self) -> usize {
        self.replay.purge_expired(self.clock.now())
    }

    pub fn replay_cache_len(&self) -> usize {
        self.replay.len()
    }

    pub async fn start_clean_up_worker(&self) {
        use tokio::time::interval;

        let mut interval = interval(StdDuration::from_secs(60));

        loop {
            interval.tick().await;
            let purged = self.purge_replay_cache();
            if purged > 0 {
                event!(Level::DEBUG, purged, "Purged redeemed states");
            }
        }
    }

    fn claims_at(&self, token: &StateToken, now: DateTime<Utc>) -> Result<StateClaims, StateError> {
        let payload = decrypt_on(&token.0, &self.secret, now.date_naive())?;
        Ok(serde_json::from_str(&payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::clock::ManualClock;
    use chrono::TimeZone;

    fn service_at(now: DateTime<Utc>) -> (StateService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let service = StateService::with_clock(
            "123password".to_string(),
            StateService::DEFAULT_TTL,
            clock.clone(),
        );
        (service, clock)
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn client(id: &str) -> ClientId {
        ClientId(id.to_string())
    }

    #[test]
    fn issued_state_verifies_to_its_client() {
        let (service, _) = service_at(noon());
        let token = service.issue(&client("abc123")).unwrap();

        assert_eq!(service.verify(&token).unwrap(), client("abc123"));
    }

    #[test]
    fn state_is_single_use() {
        let (service, _) = service_at(noon());
        let token = service.issue(&client("abc123")).unwrap();

        service.verify(&token).unwrap();
        assert!(matches!(service.verify(&token), Err(StateError::Replayed)));
    }

    #[test]
    fn inspect_does_not_consume() {
        let (service, _) = service_at(noon());
        let token = service.issue(&client("abc123")).unwrap();

        let claims = service.inspect(&token).unwrap();
        assert_eq!(claims.client_id, client("abc123"));
        assert_eq!(claims.iat, noon().timestamp());
        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn state_expires_after_ttl() {
        let (service, clock) = service_at(noon());
        let fresh = service.issue(&client("abc123")).unwrap();
        let stale = service.issue(&client("abc123")).unwrap();

        clock.advance(Duration::seconds(600));
        assert!(service.verify(&fresh).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(service.verify(&stale), Err(StateError::Expired)));
    }

    #[test]
    fn state_does_not_survive_midnight() {
        let (service, clock) = service_at(Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 50).unwrap());
        let token = service.issue(&client("abc123")).unwrap();

        clock.advance(Duration::seconds(20));
        assert!(matches!(service.verify(&token), Err(StateError::Decryption)));
    }

    #[test]
    fn state_from_the_future_is_rejected() {
        let (service, clock) = service_at(noon());
        let token = service.issue(&client("abc123")).unwrap();

        clock.set(noon() - Duration::seconds(MAX_CLOCK_SKEW_SECS + 1));
        assert!(matches!(service.verify(&token), Err(StateError::NotYetValid)));
    }

    #[test]
    fn bare_encrypted_identifiers_are_rejected() {
        let (service, _) = service_at(noon());
        let legacy = encrypt_on("abc123", "123password", noon().date_naive()).unwrap();

        assert!(matches!(
            service.verify(&StateToken(legacy)),
            Err(StateError::Claims(_))
        ));
    }

    #[test]
    fn redeemed_nonces_are_purged_after_expiry() {
        let (service, clock) = service_at(noon());
        let token = service.issue(&client("abc123")).unwrap();
        service.verify(&token).unwrap();
        assert_eq!(service.replay_cache_len(), 1);

        clock.advance(Duration::seconds(60));
        assert_eq!(service.purge_replay_cache(), 0);

        clock.advance(Duration::seconds(600));
        assert_eq!(service.purge_replay_cache(), 1);
        assert_eq!(service.replay_cache_len(), 0);
    }

    #[test]
    fn ttl_is_capped_at_one_day() {
        let clock = Arc::new(ManualClock::new(noon()));
        let service = StateService::with_clock(
            "s".to_string(),
            StdDuration::from_secs(u64::MAX),
            clock,
        );
        assert_eq!(service.ttl_secs, SECONDS_PER_DAY as i64);
    }
}
