//! Session tokens, cookies and password checks.
//!
//! A session is an HS256 JWT carried in an HttpOnly cookie. Verification is
//! pure: signature and expiry, no server-side session table.

use anyhow::{Context, Result};
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::types::AdminAccount;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub role: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing keys plus the cookie settings sessions are issued with
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
    cookie_name: String,
    secure: bool,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl_secs", &self.ttl_secs)
            .field("cookie_name", &self.cookie_name)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: u32, cookie_name: &str, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs: i64::from(ttl_hours) * 3600,
            cookie_name: cookie_name.to_string(),
            secure,
        }
    }

    /// Keys from the `[auth]` and `[server]` sections. Fails when no secret is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let secret = config.auth.resolve_secret().with_context(|| {
            format!(
                "No session secret configured (auth.jwt_secret = {:?})",
                config.auth.jwt_secret
            )
        })?;
        Ok(Self::new(
            secret.as_bytes(),
            config.auth.token_ttl_hours,
            &config.auth.cookie_name,
            config.server.secure_cookies,
        ))
    }

    /// Sign a session for `admin`, valid from now
    pub fn issue(&self, admin: &AdminAccount) -> Result<String> {
        self.issue_at(admin, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, admin: &AdminAccount, now: i64) -> Result<String> {
        let claims = Claims {
            user_id: admin.admin_id,
            email: admin.email.clone(),
            role: admin.role.clone(),
            name: admin.display_name(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to sign session token")
    }

    /// Claims of a correctly signed, unexpired token
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                None
            }
        }
    }

    /// `Set-Cookie` value carrying a fresh session
    pub fn session_cookie(&self, token: &str) -> String {
        self.cookie(token, self.ttl_secs)
    }

    /// `Set-Cookie` value that removes the session
    pub fn cleared_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if max_age == 0 {
            cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Session token from the request's `Cookie` headers
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Compare a password against a bcrypt hash on the blocking pool
pub async fn verify_password(plain: String, hash: String) -> Result<bool> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
        .await
        .context("Password check panicked")?;
    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("Unusable password hash: {}", e);
            Ok(false)
        }
    }
}

/// bcrypt hash at the library's default cost
pub async fn hash_password(plain: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, bcrypt::DEFAULT_COST))
        .await
        .context("Password hashing panicked")?
        .context("Failed to hash password")
}
