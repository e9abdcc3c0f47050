//! Token validation with a shared HS256 secret.
//!
//! Tokens are minted locally with the same secret the validator holds, so no
//! running server, Supabase project or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use profixer_backend::auth::jwt::{Claims, TokenValidator, UserMetadata};
use profixer_backend::models::profiles::Roles;

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn validator() -> TokenValidator {
    TokenValidator::SharedSecret(TEST_SECRET.to_string())
}

fn claims_for(sub: &str, email: &str, meta: Option<UserMetadata>) -> Claims {
    let now = Utc::now().timestamp() as usize;
    Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: Some(now),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: meta,
    }
}

fn mint(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

#[tokio::test]
async fn valid_token_decodes_with_signup_metadata() {
    let user_id = Uuid::new_v4();
    let claims = claims_for(
        &user_id.to_string(),
        "ana@example.com",
        Some(UserMetadata {
            first_name: Some("Ana".to_string()),
            last_name: Some("Pop".to_string()),
            avatar_url: Some("https://example.com/avatar.png".to_string()),
            role: Some("professional".to_string()),
            ..Default::default()
        }),
    );
    let token = mint(&claims, TEST_SECRET);

    let decoded = validator().validate(&token).await.expect("Token should be valid");

    assert_eq!(decoded.user_id().unwrap(), user_id);
    assert_eq!(decoded.user_email().unwrap(), "ana@example.com");
    assert_eq!(
        decoded.names(),
        (Some("Ana".to_string()), Some("Pop".to_string()))
    );
    assert_eq!(decoded.avatar_url().unwrap(), "https://example.com/avatar.png");
    assert_eq!(decoded.requested_role(), Roles::Professional);
}

#[tokio::test]
async fn oauth_full_name_is_split() {
    let claims = claims_for(
        &Uuid::new_v4().to_string(),
        "ion@example.com",
        Some(UserMetadata {
            full_name: Some("Ion Popescu".to_string()),
            picture: Some("https://example.com/p.jpg".to_string()),
            ..Default::default()
        }),
    );
    let decoded = validator()
        .validate(&mint(&claims, TEST_SECRET))
        .await
        .unwrap();

    assert_eq!(
        decoded.names(),
        (Some("Ion".to_string()), Some("Popescu".to_string()))
    );
    assert_eq!(decoded.avatar_url().unwrap(), "https://example.com/p.jpg");
    assert_eq!(decoded.requested_role(), Roles::Client);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    let mut claims = claims_for(&Uuid::new_v4().to_string(), "old@example.com", None);
    // Well past the 60s default leeway.
    claims.exp = now - 300;
    claims.iat = Some(now - 3600);

    let result = validator().validate(&mint(&claims, TEST_SECRET)).await;
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let claims = claims_for(&Uuid::new_v4().to_string(), "bob@example.com", None);
    let token = mint(&claims, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");

    let result = validator().validate(&token).await;
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    assert!(validator().validate("not.a.valid.jwt").await.is_err());
}

#[test]
fn claims_helpers_without_metadata() {
    let claims = claims_for(&Uuid::new_v4().to_string(), "bare@example.com", None);

    assert_eq!(claims.user_email().unwrap(), "bare@example.com");
    assert_eq!(claims.names(), (None, None));
    assert!(claims.avatar_url().is_none());
    assert_eq!(claims.requested_role(), Roles::Client);
}

#[test]
fn non_uuid_subject_is_rejected() {
    let claims = claims_for("service-account", "svc@example.com", None);
    assert!(claims.user_id().is_err());
}
