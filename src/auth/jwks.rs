use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::Claims;

/// Supabase publishes its asymmetric signing keys here.
fn jwks_url(supabase_url: &str) -> String {
    format!("{supabase_url}/auth/v1/.well-known/jwks.json")
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    alg: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

#[derive(Clone)]
struct VerifyingKey {
    x: String,
    y: String,
    algorithm: Algorithm,
}

impl TryFrom<Jwk> for VerifyingKey {
    type Error = String;

    fn try_from(jwk: Jwk) -> Result<Self, Self::Error> {
        let algorithm = match jwk.alg.as_deref().unwrap_or("ES256") {
            "ES256" => Algorithm::ES256,
            "ES384" => Algorithm::ES384,
            other => return Err(format!("Unsupported JWK algorithm {other}")),
        };

        Ok(Self {
            x: jwk.x.ok_or("Missing 'x' in JWK")?,
            y: jwk.y.ok_or("Missing 'y' in JWK")?,
            algorithm,
        })
    }
}

/// Verifying keys fetched from the project's JWKS endpoint, cached by `kid` for an hour.
#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, VerifyingKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        let keys = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            keys,
            jwks_url: jwks_url(supabase_url),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_key_set(&self) -> Result<JwkSet, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn key_for(&self, kid: &str) -> Result<VerifyingKey, String> {
        if let Some(cached) = self.keys.get(kid).await {
            return Ok(cached);
        }

        let jwk = self
            .fetch_key_set()
            .await?
            .keys
            .into_iter()
            .find(|k| k.kid == kid)
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

        let key = VerifyingKey::try_from(jwk)?;
        self.keys.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate(&self, token: &str) -> Result<Claims, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.key_for(&kid).await?;
        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_jwks_url_from_project_url() {
        assert_eq!(
            jwks_url("https://abcd.supabase.co"),
            "https://abcd.supabase.co/auth/v1/.well-known/jwks.json"
        );
    }

    #[test]
    fn rejects_unsupported_key_algorithm() {
        let jwk = Jwk {
            kid: "k1".into(),
            alg: Some("RS256".into()),
            x: Some("x".into()),
            y: Some("y".into()),
        };
        assert!(VerifyingKey::try_from(jwk).is_err());
    }

    #[test]
    fn defaults_to_es256_when_alg_missing() {
        let jwk = Jwk {
            kid: "k1".into(),
            alg: None,
            x: Some("x".into()),
            y: Some("y".into()),
        };
        let key = VerifyingKey::try_from(jwk).unwrap();
        assert_eq!(key.algorithm, Algorithm::ES256);
    }
}
