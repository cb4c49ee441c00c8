//! JWT issuance and validation
//!
//! Tokens are HS256-signed and carry issuer, audience, subject, issued-at
//! and expiry. Nothing is stored server-side; a token is valid if its
//! signature, issuer, audience and expiry check out against the
//! configured `TokenConfig`.
//!
//! `iat` and `exp` are NumericDates with millisecond precision, so a
//! sub-second lifetime still yields a token that verifies until it lapses.

use crate::config::ConfigError;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use credential_service_shared::TokenError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Claim names owned by the token service; extra claims may not shadow them
const RESERVED_CLAIMS: [&str; 7] = ["sub", "iss", "aud", "iat", "exp", "user_id", "username"];

/// Token signing configuration
///
/// Resolved once at startup. Construction fails if any field that the
/// token format depends on is empty.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    issuer: String,
    audience: String,
    expires_in: Duration,
    secret: SecretString,
}

impl TokenConfig {
    /// Create a validated token configuration
    ///
    /// `expires_in_ms` may be negative, which yields tokens that are
    /// already expired when issued.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expires_in_ms: i64,
        secret: SecretString,
    ) -> Result<Self, ConfigError> {
        let issuer = issuer.into();
        let audience = audience.into();

        if secret.expose_secret().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt.issuer must not be empty".to_string()));
        }
        if audience.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt.audience must not be empty".to_string()));
        }

        Ok(Self {
            issuer,
            audience,
            expires_in: Duration::milliseconds(expires_in_ms),
            secret,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }
}

/// JWT claims as they appear on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub user_id: String,
    pub username: String,
    /// Issued at (Unix seconds, fractional)
    pub iat: f64,
    /// Expiration time (Unix seconds, fractional)
    pub exp: f64,
    /// Additional caller-supplied claims
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Identity claims supplied when issuing a token
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl TokenClaims {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an additional claim
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Result of verifying a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerification {
    Valid(Claims),
    Invalid(TokenError),
}

impl TokenVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenVerification::Valid(_))
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            TokenVerification::Valid(claims) => Some(claims),
            TokenVerification::Invalid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Claims, TokenError> {
        match self {
            TokenVerification::Valid(claims) => Ok(claims),
            TokenVerification::Invalid(err) => Err(err),
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }
}

/// Token service for issuing and verifying identity tokens
///
/// Cheap to clone: keys and validation rules are behind `Arc`.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    issuer: Arc<str>,
    audience: Arc<str>,
    expires_in: Duration,
}

impl TokenService {
    /// Create a token service with pre-computed keys
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience()]);
        // jsonwebtoken only accepts integer `exp`; presence is enforced by
        // `Claims` and expiry is checked after decoding with no leeway.
        validation.set_required_spec_claims(&["iss", "aud", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(&config.secret),
            validation: Arc::new(validation),
            issuer: Arc::from(config.issuer()),
            audience: Arc::from(config.audience()),
            expires_in: config.expires_in(),
        }
    }

    /// Issue a new signed token for the given identity
    pub fn generate(&self, claims: TokenClaims) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.expires_in;

        let extra = claims
            .extra
            .into_iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .collect();

        let claims = Claims {
            sub: claims.username.clone(),
            iss: self.issuer.to_string(),
            aud: self.audience.to_string(),
            user_id: claims.user_id.to_string(),
            username: claims.username,
            iat: numeric_date(now),
            exp: numeric_date(exp),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    /// Verify a token
    ///
    /// Never fails: malformed, mis-signed, foreign or expired tokens come
    /// back as `TokenVerification::Invalid`.
    pub fn verify(&self, token: &str) -> TokenVerification {
        let data = match decode::<Claims>(token, &self.keys.decoding, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!(error = %e, "Token rejected");
                return TokenVerification::Invalid(TokenError::InvalidToken);
            }
        };

        // A token is valid strictly before its expiry instant.
        if Utc::now().timestamp_millis() >= millis(data.claims.exp) {
            debug!(sub = %data.claims.sub, "Token expired");
            return TokenVerification::Invalid(TokenError::Expired);
        }

        TokenVerification::Valid(data.claims)
    }

    /// Token lifetime in whole seconds
    #[inline]
    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in.num_seconds()
    }
}

fn numeric_date(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

fn millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}
