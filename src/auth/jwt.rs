use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, INVALID_TOKEN, NO_TOKEN},
    state::AppState,
};

/// Header the client sends the token in; `Authorization: Bearer` is also accepted.
pub const TOKEN_HEADER: &str = "x-auth-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
}

/// Token payload: `{user: {id}, iat, exp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: Subject,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self::new(cfg.secret.as_bytes(), cfg.ttl_seconds)
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.sign_at(user_id, OffsetDateTime::now_utc())
    }

    fn sign_at(&self, user_id: Uuid, now: OffsetDateTime) -> anyhow::Result<String> {
        let claims = Claims {
            user: Subject { id: user_id },
            iat: now.unix_timestamp() as usize,
            exp: (now + self.ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = %data.claims.user.id, "jwt verified");
        Ok(data.claims)
    }
}

/// Authenticated caller; rejects with 401 when the token is absent or invalid.
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .or_else(|| {
                headers
                    .get(axum::http::header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
            })
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized(NO_TOKEN))?;

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.user.id)),
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                Err(ApiError::Unauthorized(INVALID_TOKEN))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> JwtKeys {
        JwtKeys::new(secret.as_bytes(), crate::config::DEFAULT_TOKEN_TTL_SECS)
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let keys = keys("dev-secret");
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.user.id, user_id);
        assert_eq!(claims.exp - claims.iat, 360_000);
    }

    #[test]
    fn payload_nests_id_under_user() {
        let keys = keys("dev-secret");
        let user_id = Uuid::new_v4();
        let claims = keys.verify(&keys.sign(user_id).unwrap()).unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["user"]["id"], user_id.to_string());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let token = keys("secret-a").sign(Uuid::new_v4()).unwrap();
        assert!(keys("secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = JwtKeys::new(b"dev-secret", 60);
        let issued = OffsetDateTime::now_utc() - Duration::hours(1);
        let token = keys.sign_at(Uuid::new_v4(), issued).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
