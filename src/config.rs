use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Supabase project settings.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// e.g. `https://abcd.supabase.co`
    pub url: String,
    pub project_ref: String,
    pub anon_key: String,
    pub service_role_key: String,
    /// Legacy HS256 projects sign with a shared secret instead of publishing JWKS.
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub price_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase: SupabaseConfig,
    pub stripe: StripeConfig,
    pub frontend_url: String,
    pub subscription_period_days: i64,
    pub run_migrations: bool,
    pub port: u16,
    pub cache: CacheConfig,
}

/// Cache TTLs.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub profile_ttl: Duration,
    pub craftsman_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_ttl: Duration::from_secs(900), // 15 minutes
            craftsman_ttl: Duration::from_secs(120),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            profile_ttl: parse_duration_secs("CACHE_TTL_PROFILES", 900),
            craftsman_ttl: parse_duration_secs("CACHE_TTL_CRAFTSMEN", 120),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment (after `dotenv`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = required("SUPABASE_URL")?;
        let project_ref = project_ref_from_url(&supabase_url)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase: SupabaseConfig {
                url: supabase_url.trim_end_matches('/').to_string(),
                project_ref,
                anon_key: required("SUPABASE_ANON_KEY")?,
                service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
                jwt_secret: optional("SUPABASE_JWT_SECRET"),
            },
            stripe: StripeConfig {
                secret_key: required("STRIPE_SECRET_KEY")?,
                webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
                price_id: required("STRIPE_PRICE_ID")?,
            },
            frontend_url: optional("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .trim_end_matches('/')
                .to_string(),
            subscription_period_days: parsed("SUBSCRIPTION_PERIOD_DAYS", 30)?,
            run_migrations: parsed("RUN_MIGRATIONS", false)?,
            port: parsed("PORT", 8080)?,
            cache: CacheConfig::from_env(),
        })
    }
}

/// Extract `PROJECT` from `https://PROJECT.supabase.co`.
pub fn project_ref_from_url(url: &str) -> Result<String, ConfigError> {
    url.trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: "expected https://PROJECT.supabase.co".to_string(),
        })
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_project_ref() {
        assert_eq!(
            project_ref_from_url("https://abcd1234.supabase.co").unwrap(),
            "abcd1234"
        );
        assert_eq!(
            project_ref_from_url("https://abcd1234.supabase.co/").unwrap(),
            "abcd1234"
        );
    }

    #[test]
    fn rejects_non_supabase_url() {
        assert!(project_ref_from_url("http://abcd.supabase.co").is_err());
        assert!(project_ref_from_url("https://example.com").is_err());
        assert!(project_ref_from_url("https://.supabase.co").is_err());
    }
}
