//! Visitor identity tokens
//!
//! Each visitor carries a signed cookie whose subject is their [`OwnerId`].

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use futures_util::future::{Ready, ready};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::IdentityConfig;
use crate::errors::{Result, SnaplinkError};
use crate::storage::OwnerId;

/// Identity token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies identity tokens (HS256)
pub struct IdentityCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    cookie_name: String,
    max_age_days: i64,
}

impl IdentityCodec {
    pub fn new(secret: &str, cookie_name: impl Into<String>, max_age_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: cookie_name.into(),
            max_age_days,
        }
    }

    /// Create IdentityCodec from config
    pub fn from_config(config: &IdentityConfig) -> Self {
        // 未配置 secret 时生成随机值，重启后旧 Cookie 失效
        let secret = config
            .secret
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                warn!("identity.secret not configured, generating a random one; identities will not survive a restart");
                crate::utils::generate_secure_token(32)
            });

        Self::new(&secret, config.cookie_name.clone(), config.max_age_days)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a token for `owner`
    pub fn issue(&self, owner: OwnerId) -> Result<String> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: owner.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.max_age_days)).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify a token and return its owner
    pub fn verify(&self, token: &str) -> Result<OwnerId> {
        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &Validation::default())?;

        let owner: OwnerId = token_data
            .claims
            .sub
            .parse()
            .map_err(|e| SnaplinkError::identity(format!("Invalid subject: {}", e)))?;
        if owner.is_anonymous() {
            return Err(SnaplinkError::identity("Anonymous subject is not a valid identity"));
        }
        Ok(owner)
    }

    /// Build the identity cookie carrying `token`
    pub fn build_cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.cookie_name.clone(), token);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_max_age(actix_web::cookie::time::Duration::days(self.max_age_days));
        cookie
    }
}

/// 从 request extensions 中取出当前访客；未经过 IdentityMiddleware 时视为匿名
impl FromRequest for OwnerId {
    type Error = actix_web::Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let owner = req
            .extensions()
            .get::<OwnerId>()
            .copied()
            .unwrap_or(OwnerId::ANONYMOUS);
        ready(Ok(owner))
    }
}
