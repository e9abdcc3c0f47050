use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "professional")]
    Professional,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Trade a professional offers. Stored as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CraftsmanType {
    #[sea_orm(string_value = "plumber")]
    Plumber,
    #[sea_orm(string_value = "electrician")]
    Electrician,
    #[sea_orm(string_value = "carpenter")]
    Carpenter,
    #[sea_orm(string_value = "painter")]
    Painter,
    #[sea_orm(string_value = "mason")]
    Mason,
    #[sea_orm(string_value = "locksmith")]
    Locksmith,
    #[sea_orm(string_value = "roofer")]
    Roofer,
    #[sea_orm(string_value = "tiler")]
    Tiler,
    #[sea_orm(string_value = "hvac_technician")]
    HvacTechnician,
    #[sea_orm(string_value = "gardener")]
    Gardener,
    #[sea_orm(string_value = "cleaner")]
    Cleaner,
    #[sea_orm(string_value = "handyman")]
    Handyman,
    #[sea_orm(string_value = "other")]
    Other,
}

/// SeaORM entity for the `profiles` table.
///
/// `id` is the Supabase auth uid; rows are created lazily by the auth extractor.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Roles,
    pub craftsman_type: Option<CraftsmanType>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
    pub subscription_active: bool,
    pub subscription_end_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolio::Entity")]
    Portfolio,
    #[sea_orm(has_many = "super::qualifications::Entity")]
    Qualifications,
    #[sea_orm(has_many = "super::specializations::Entity")]
    Specializations,
    #[sea_orm(has_many = "super::job_listings::Entity")]
    JobListings,
    #[sea_orm(has_many = "super::subscriptions::Entity")]
    Subscriptions,
}

impl Related<super::portfolio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl Related<super::qualifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Qualifications.def()
    }
}

impl Related<super::specializations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Specializations.def()
    }
}

impl Related<super::job_listings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListings.def()
    }
}

impl Related<super::subscriptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "First Last", skipping whichever part is missing.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Roles::Admin
    }

    pub fn is_professional(&self) -> bool {
        self.role == Roles::Professional
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth extractor to create a profile from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateProfileFromAuth {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Roles,
}

/// Used by the `POST /api/auth/complete-profile` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Roles>,
    pub craftsman_type: Option<CraftsmanType>,
}

/// Owner-level profile edit. Roles change only through `AdminUpdateProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub craftsman_type: Option<CraftsmanType>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub avatar_url: Option<String>,
}

/// Admin-level edit.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUpdateProfile {
    #[serde(flatten)]
    pub profile: UpdateProfile,
    pub role: Option<Roles>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Query parameters for the admin user list.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub role: Option<Roles>,
}

impl ProfileListQuery {
    pub fn pagination(&self) -> super::PaginationQuery {
        super::PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A safe profile representation for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Roles,
    pub craftsman_type: Option<CraftsmanType>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
    pub subscription_active: bool,
    pub subscription_end_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for ProfileResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            phone: m.phone,
            role: m.role,
            craftsman_type: m.craftsman_type,
            description: m.description,
            address: m.address,
            city: m.city,
            county: m.county,
            latitude: m.latitude,
            longitude: m.longitude,
            avatar_url: m.avatar_url,
            subscription_active: m.subscription_active,
            subscription_end_date: m.subscription_end_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// What other users see of a profile: no email or phone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Roles,
    pub craftsman_type: Option<CraftsmanType>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
}

impl From<Model> for PublicProfile {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            role: m.role,
            craftsman_type: m.craftsman_type,
            description: m.description,
            city: m.city,
            county: m.county,
            latitude: m.latitude,
            longitude: m.longitude,
            avatar_url: m.avatar_url,
        }
    }
}
