use sea_orm::*;
use uuid::Uuid;

use crate::models::qualifications::{self, CreateQualification, UpdateQualification};

pub async fn insert_qualification(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
    input: CreateQualification,
) -> Result<qualifications::Model, DbErr> {
    let new_item = qualifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        craftsman_id: Set(craftsman_id),
        title: Set(input.title),
        issuer: Set(input.issuer),
        issued_at: Set(input.issued_at),
        document_url: Set(input.document_url),
        created_at: Set(chrono::Utc::now()),
    };

    new_item.insert(db).await
}

pub async fn get_qualification_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<qualifications::Model>, DbErr> {
    qualifications::Entity::find_by_id(id).one(db).await
}

pub async fn get_qualifications_by_craftsman(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
) -> Result<Vec<qualifications::Model>, DbErr> {
    qualifications::Entity::find()
        .filter(qualifications::Column::CraftsmanId.eq(craftsman_id))
        .order_by_desc(qualifications::Column::IssuedAt)
        .all(db)
        .await
}

pub async fn update_qualification(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateQualification,
) -> Result<qualifications::Model, DbErr> {
    let item = qualifications::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Qualification not found".to_string()))?;

    let mut active: qualifications::ActiveModel = item.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(issuer) = input.issuer {
        active.issuer = Set(Some(issuer));
    }
    if let Some(issued_at) = input.issued_at {
        active.issued_at = Set(Some(issued_at));
    }
    if let Some(document_url) = input.document_url {
        active.document_url = Set(Some(document_url));
    }

    active.update(db).await
}

pub async fn delete_qualification(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<DeleteResult, DbErr> {
    qualifications::Entity::delete_by_id(id).exec(db).await
}
