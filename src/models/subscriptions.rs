use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// SeaORM entity for the `subscriptions` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub craftsman_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub payment_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CraftsmanId",
        to = "super::profiles::Column::Id"
    )]
    Craftsman,
    #[sea_orm(
        belongs_to = "super::payments::Entity",
        from = "Column::PaymentId",
        to = "super::payments::Column::Id"
    )]
    Payment,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Craftsman.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Expiry is decided at read time: the stored status may still say
    /// `active` after `end_date` has passed.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date > now
    }

    pub fn effective_status(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        match self.status {
            SubscriptionStatus::Active if self.end_date <= now => SubscriptionStatus::Expired,
            status => status,
        }
    }
}

/// Window for a newly paid period. A still-running subscription is extended
/// from its current end date; a lapsed one starts over from `now`.
pub fn next_period(
    current_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    period_days: i64,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = match current_end {
        Some(end) if end > now => end,
        _ => now,
    };
    (start, start + Duration::days(period_days))
}

// ── DTOs ──

/// Body of `PUT /api/admin/subscriptions/{craftsman_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetSubscriptionStatus {
    pub active: bool,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionOverview {
    pub craftsman_id: Uuid,
    pub active: bool,
    pub end_date: Option<DateTime<Utc>>,
    pub current: Option<SubscriptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub id: Uuid,
    pub craftsman_id: Uuid,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_id: Option<Uuid>,
}

impl SubscriptionView {
    pub fn at(m: Model, now: DateTime<Utc>) -> Self {
        Self {
            id: m.id,
            craftsman_id: m.craftsman_id,
            status: m.effective_status(now),
            start_date: m.start_date,
            end_date: m.end_date,
            payment_id: m.payment_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: SubscriptionStatus, end_date: DateTime<Utc>) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            craftsman_id: Uuid::new_v4(),
            status,
            start_date: now - Duration::days(10),
            end_date,
            payment_id: None,
            created_at: now - Duration::days(10),
            updated_at: None,
        }
    }

    #[test]
    fn active_subscription_past_end_date_reads_as_expired() {
        let now = Utc::now();
        let sub = subscription(SubscriptionStatus::Active, now - Duration::hours(1));

        assert!(!sub.is_active_at(now));
        assert_eq!(sub.effective_status(now), SubscriptionStatus::Expired);
    }

    #[test]
    fn active_subscription_before_end_date_is_active() {
        let now = Utc::now();
        let sub = subscription(SubscriptionStatus::Active, now + Duration::days(3));

        assert!(sub.is_active_at(now));
        assert_eq!(sub.effective_status(now), SubscriptionStatus::Active);
    }

    #[test]
    fn cancelled_subscription_is_never_active() {
        let now = Utc::now();
        let sub = subscription(SubscriptionStatus::Cancelled, now + Duration::days(3));

        assert!(!sub.is_active_at(now));
        assert_eq!(sub.effective_status(now), SubscriptionStatus::Cancelled);
    }

    #[test]
    fn next_period_extends_running_subscription() {
        let now = Utc::now();
        let end = now + Duration::days(5);

        let (start, new_end) = next_period(Some(end), now, 30);

        assert_eq!(start, end);
        assert_eq!(new_end, end + Duration::days(30));
    }

    #[test]
    fn next_period_restarts_lapsed_subscription() {
        let now = Utc::now();

        let (start, end) = next_period(Some(now - Duration::days(2)), now, 30);
        assert_eq!(start, now);
        assert_eq!(end, now + Duration::days(30));

        let (start, _) = next_period(None, now, 30);
        assert_eq!(start, now);
    }
}
