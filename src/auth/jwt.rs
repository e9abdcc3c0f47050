use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwks::JwksCache;
use crate::config::SupabaseConfig;
use crate::models::profiles::Roles;

/// Supabase JWT claims.
///
/// `sub` is the user's UUID in `auth.users`, which is also the profile id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role (e.g. "authenticated"), not the marketplace role.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

/// Sign-up form fields or OAuth provider data.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    /// Role chosen on the sign-up form.
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// Prefer the top-level email, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }

    /// `(first, last)` from explicit metadata fields, else split from the full name.
    pub fn names(&self) -> (Option<String>, Option<String>) {
        let Some(meta) = self.user_metadata.as_ref() else {
            return (None, None);
        };

        if meta.first_name.is_some() || meta.last_name.is_some() {
            return (meta.first_name.clone(), meta.last_name.clone());
        }

        match meta.full_name.as_deref().or(meta.name.as_deref()) {
            Some(full) => split_full_name(full),
            None => (None, None),
        }
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// Marketplace role requested at sign-up. Admin can never be self-assigned.
    pub fn requested_role(&self) -> Roles {
        match self.user_metadata.as_ref().and_then(|m| m.role.as_deref()) {
            Some("professional") => Roles::Professional,
            _ => Roles::Client,
        }
    }
}

fn split_full_name(full: &str) -> (Option<String>, Option<String>) {
    let full = full.trim();
    if full.is_empty() {
        return (None, None);
    }
    match full.split_once(char::is_whitespace) {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
        None => (Some(full.to_string()), None),
    }
}

/// How access tokens are verified.
///
/// Projects on asymmetric signing keys publish a JWKS; legacy projects sign
/// with the shared HS256 secret.
#[derive(Clone)]
pub enum TokenValidator {
    Jwks(JwksCache),
    SharedSecret(String),
}

impl TokenValidator {
    pub fn from_config(config: &SupabaseConfig) -> Self {
        match &config.jwt_secret {
            Some(secret) => TokenValidator::SharedSecret(secret.clone()),
            None => TokenValidator::Jwks(JwksCache::new(&config.url, &config.anon_key)),
        }
    }

    pub async fn validate(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenValidator::Jwks(cache) => cache.validate(token).await,
            TokenValidator::SharedSecret(secret) => validate_hs256(token, secret),
        }
    }
}

fn validate_hs256(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Token validation failed: {e}"))
}
