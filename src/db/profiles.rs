use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::profiles::{
    self, CompleteProfile, CreateProfileFromAuth, Roles, UpdateProfile,
};

/// Create a profile from Supabase Auth JWT claims on first sight (called by the auth extractor).
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateProfileFromAuth,
) -> Result<profiles::Model, DbErr> {
    if let Some(existing) = profiles::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_profile = profiles::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        phone: Set(None),
        role: Set(input.role),
        craftsman_type: Set(None),
        description: Set(None),
        address: Set(None),
        city: Set(None),
        county: Set(None),
        latitude: Set(None),
        longitude: Set(None),
        avatar_url: Set(input.avatar_url),
        subscription_active: Set(false),
        subscription_end_date: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_profile.insert(db).await
}

/// Fetch a single profile by ID.
pub async fn get_profile_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(db).await
}

/// Fetch profiles for many IDs and return an id -> profile map.
pub async fn get_profiles_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, profiles::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = profiles::Entity::find()
        .filter(profiles::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|p| (p.id, p)).collect())
}

/// Paginated profile list, newest first, optionally restricted to one role.
pub async fn get_profiles_paginated(
    db: &DatabaseConnection,
    role: Option<Roles>,
    page: u64,
    limit: u64,
) -> Result<(Vec<profiles::Model>, u64), DbErr> {
    let mut query = profiles::Entity::find().order_by_desc(profiles::Column::CreatedAt);
    if let Some(role) = role {
        query = query.filter(profiles::Column::Role.eq(role));
    }

    let paginator = query.paginate(db, limit);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok((items, total))
}

/// Count profiles per role.
pub async fn count_by_role(db: &DatabaseConnection, role: Roles) -> Result<u64, DbErr> {
    profiles::Entity::find()
        .filter(profiles::Column::Role.eq(role))
        .count(db)
        .await
}

/// Complete a profile after first login (names, phone, role, trade).
pub async fn complete_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: CompleteProfile,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(craftsman_type) = input.craftsman_type {
        active.craftsman_type = Set(Some(craftsman_type));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Update an existing profile. `role` is only passed by admin routes.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
    role: Option<Roles>,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(craftsman_type) = input.craftsman_type {
        active.craftsman_type = Set(Some(craftsman_type));
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(address) = input.address {
        active.address = Set(Some(address));
    }
    if let Some(city) = input.city {
        active.city = Set(Some(city));
    }
    if let Some(county) = input.county {
        active.county = Set(Some(county));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(role) = role {
        active.role = Set(role);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Store the profile's geolocation.
pub async fn update_location(
    db: &DatabaseConnection,
    id: Uuid,
    latitude: f64,
    longitude: f64,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();
    active.latitude = Set(Some(latitude));
    active.longitude = Set(Some(longitude));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a profile by ID. Dependent rows go with it through FK cascades.
pub async fn delete_profile(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    profiles::Entity::delete_by_id(id).exec(db).await
}
