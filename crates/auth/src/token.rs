//! Workspace-scoped login tokens handed out after a password sign-in.

use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_LOGIN_TOKEN_TTL_SECONDS: i64 = 15 * 60;
const MIN_SECRET_LEN: usize = 32;
const ISSUER: &str = "gatehouse";
const AUDIENCE: &str = "gatehouse:workspace";

#[derive(Debug, Serialize, Deserialize)]
struct LoginClaims {
    sub: Uuid,
    ws: Uuid,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkspaceAccess {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
}

#[derive(Debug, Error)]
pub enum LoginTokenError {
    #[error("login token has expired")]
    Expired,
    #[error("login token was not issued for a gatehouse workspace")]
    WrongAudience,
    #[error("login token is malformed or has a bad signature")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for LoginTokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => Self::WrongAudience,
            _ => Self::Invalid(error),
        }
    }
}

#[derive(Clone)]
pub struct LoginTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl LoginTokenService {
    pub fn new(secret: &str, ttl_seconds: i64) -> anyhow::Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            bail!("GATEHOUSE_AUTH_TOKEN_SECRET must be at least {MIN_SECRET_LEN} characters");
        }
        if ttl_seconds <= 0 {
            bail!("login token lifetime must be positive, got {ttl_seconds}s");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_seconds),
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user_id: Uuid, workspace_id: Uuid) -> anyhow::Result<String> {
        self.issue_at(user_id, workspace_id, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: Uuid,
        workspace_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let claims = LoginClaims {
            sub: user_id,
            ws: workspace_id,
            iss: ISSUER.to_owned(),
            aud: AUDIENCE.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to sign login token")
    }

    pub fn validate(&self, token: &str) -> Result<WorkspaceAccess, LoginTokenError> {
        let claims = decode::<LoginClaims>(token, &self.decoding_key, &self.validation)?.claims;
        Ok(WorkspaceAccess { user_id: claims.sub, workspace_id: claims.ws })
    }
}
