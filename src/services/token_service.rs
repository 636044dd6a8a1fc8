use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::LiveKitConfig;
use crate::error::{Error, Result};

/// Lifetime of every room token. Tokens are not renewable.
pub const ROOM_TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;

/// Permissions carried by a room token, in the transport's claim format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room: String,
    pub room_join: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub room_create: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl VideoGrant {
    /// Join + publish + subscribe + data on a single room.
    pub fn participant(room: &str) -> Self {
        Self {
            room: room.to_string(),
            room_join: true,
            room_create: false,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomClaims {
    pub iss: String,
    pub sub: String,
    pub jti: String,
    pub nbf: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub video: VideoGrant,
}

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub identity: String,
    pub name: Option<String>,
    pub grant: VideoGrant,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub jwt: String,
    pub room: String,
    pub identity: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints signed, time-bounded room credentials. Holds no state besides the
/// signing credentials, which may be absent; issuing then fails with a
/// configuration error instead of at startup.
#[derive(Clone)]
pub struct TokenIssuer {
    api_key: Option<String>,
    api_secret: Option<String>,
    ws_url: Option<String>,
}

impl TokenIssuer {
    pub fn new(config: &LiveKitConfig) -> Self {
        if config.api_key.is_none() || config.api_secret.is_none() {
            tracing::warn!("Room token issuer has no signing credentials; token requests will fail");
        }
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            ws_url: config.ws_url.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.api_secret.is_some()
    }

    /// Transport URL clients connect to with the issued tokens.
    pub fn ws_url(&self) -> Result<&str> {
        self.ws_url
            .as_deref()
            .ok_or_else(|| Error::Config("LiveKit URL not configured".to_string()))
    }

    pub fn issue(&self, request: &TokenRequest) -> Result<IssuedToken> {
        self.issue_at(request, Utc::now())
    }

    pub fn issue_at(&self, request: &TokenRequest, now: DateTime<Utc>) -> Result<IssuedToken> {
        let (Some(api_key), Some(api_secret)) = (&self.api_key, &self.api_secret) else {
            return Err(Error::Config(
                "LiveKit credentials not configured".to_string(),
            ));
        };

        let expires_at = now + Duration::seconds(ROOM_TOKEN_TTL_SECONDS);
        let claims = RoomClaims {
            iss: api_key.clone(),
            sub: request.identity.clone(),
            jti: format!("{}-{}", request.identity, Uuid::new_v4().simple()),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            name: request.name.clone(),
            video: request.grant.clone(),
        };

        let jwt = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(api_secret.as_bytes()),
        )?;

        tracing::debug!(
            identity = %request.identity,
            room = %request.grant.room,
            "issued room token"
        );

        Ok(IssuedToken {
            jwt,
            room: request.grant.room.clone(),
            identity: request.identity.clone(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&LiveKitConfig {
            api_key: Some("APIkey123".into()),
            api_secret: Some("secret-for-tests".into()),
            ws_url: Some("wss://rooms.example.test".into()),
        })
    }

    fn decode_claims(jwt: &str) -> RoomClaims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<RoomClaims>(
            jwt,
            &DecodingKey::from_secret(b"secret-for-tests"),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn token_carries_identity_room_and_two_hour_window() {
        let token = issuer()
            .issue(&TokenRequest {
                identity: "user-1".into(),
                name: Some("Candidate_user-1".into()),
                grant: VideoGrant::participant("interview_job_user_1"),
            })
            .unwrap();

        let claims = decode_claims(&token.jwt);
        assert_eq!(claims.iss, "APIkey123");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.video.room, "interview_job_user_1");
        assert!(claims.video.room_join && claims.video.can_publish_data);
        assert!(!claims.video.room_create);
        assert_eq!(claims.exp - claims.nbf, ROOM_TOKEN_TTL_SECONDS);
        assert_eq!(token.room, "interview_job_user_1");
    }

    #[test]
    fn missing_credentials_is_a_configuration_error() {
        let issuer = TokenIssuer::new(&LiveKitConfig::default());
        assert!(!issuer.is_configured());
        let err = issuer
            .issue(&TokenRequest {
                identity: "x".into(),
                name: None,
                grant: VideoGrant::participant("r"),
            })
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(matches!(issuer.ws_url(), Err(Error::Config(_))));
    }
}
