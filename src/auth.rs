//! JWT issuing and verification from `auth` settings.

use crate::error::{AppError, SettingsError};
use crate::settings::{rsa_algorithm, AuthSettings};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Token payload: subject, expiry (unix seconds), token kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
}

pub struct JwtKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_lifetime: i64,
    refresh_lifetime: i64,
}

impl JwtKeys {
    /// Parse keys and algorithms (RSA family only). Tokens are signed with the first algorithm and
    /// accepted with any of them.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, SettingsError> {
        let algorithms = settings
            .algorithms
            .iter()
            .map(|a| rsa_algorithm(a))
            .collect::<Result<Vec<_>, _>>()?;
        let algorithm = *algorithms
            .first()
            .ok_or_else(|| SettingsError::invalid("auth.algorithms", "at least one algorithm is required"))?;

        let encoding = EncodingKey::from_rsa_pem(settings.private_key.as_bytes())
            .map_err(|e| SettingsError::invalid("auth.private_key", e.to_string()))?;
        let decoding = DecodingKey::from_rsa_pem(settings.public_key.as_bytes())
            .map_err(|e| SettingsError::invalid("auth.public_key", e.to_string()))?;

        let mut validation = Validation::new(algorithm);
        validation.algorithms = algorithms;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtKeys {
            algorithm,
            encoding,
            decoding,
            validation,
            access_lifetime: seconds(settings.access_token_lifetime),
            refresh_lifetime: seconds(settings.refresh_token_lifetime),
        })
    }

    /// Sign a token for `sub` expiring after the configured lifetime for `kind`.
    pub fn issue(&self, sub: Uuid, kind: TokenKind) -> Result<String, AppError> {
        let lifetime = match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        };
        self.encode(&Claims {
            sub,
            exp: Utc::now().timestamp().saturating_add(lifetime),
            kind,
        })
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }

    /// Check signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}

fn seconds(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}
