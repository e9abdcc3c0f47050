use uuid::Uuid;

use crate::error::ApiError;
use crate::models::profiles::{self, Roles};

/// Owners may modify their own rows; admins may modify anything.
pub fn ensure_owner_or_admin(
    user: &profiles::Model,
    owner_id: Uuid,
    what: &str,
) -> Result<(), ApiError> {
    if user.id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("You do not own this {what}")))
    }
}

pub fn require_role(user: &profiles::Model, role: Roles, action: &str) -> Result<(), ApiError> {
    if user.role == role {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "Only {} accounts can {action}",
            role_label(role)
        )))
    }
}

pub fn require_professional(user: &profiles::Model, action: &str) -> Result<(), ApiError> {
    require_role(user, Roles::Professional, action)
}

pub fn require_client(user: &profiles::Model, action: &str) -> Result<(), ApiError> {
    require_role(user, Roles::Client, action)
}

fn role_label(role: Roles) -> &'static str {
    match role {
        Roles::Client => "client",
        Roles::Professional => "professional",
        Roles::Admin => "admin",
    }
}
