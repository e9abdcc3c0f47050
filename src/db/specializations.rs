use sea_orm::*;
use uuid::Uuid;

use crate::models::specializations::{self, CreateSpecialization, UpdateSpecialization};

pub async fn insert_specialization(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
    input: CreateSpecialization,
) -> Result<specializations::Model, DbErr> {
    let new_item = specializations::ActiveModel {
        id: Set(Uuid::new_v4()),
        craftsman_id: Set(craftsman_id),
        name: Set(input.name),
        years_experience: Set(input.years_experience),
        created_at: Set(chrono::Utc::now()),
    };

    new_item.insert(db).await
}

pub async fn get_specialization_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<specializations::Model>, DbErr> {
    specializations::Entity::find_by_id(id).one(db).await
}

pub async fn get_specializations_by_craftsman(
    db: &DatabaseConnection,
    craftsman_id: Uuid,
) -> Result<Vec<specializations::Model>, DbErr> {
    specializations::Entity::find()
        .filter(specializations::Column::CraftsmanId.eq(craftsman_id))
        .order_by_asc(specializations::Column::Name)
        .all(db)
        .await
}

pub async fn update_specialization(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateSpecialization,
) -> Result<specializations::Model, DbErr> {
    let item = specializations::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Specialization not found".to_string()))?;

    let mut active: specializations::ActiveModel = item.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(years) = input.years_experience {
        active.years_experience = Set(Some(years));
    }

    active.update(db).await
}

pub async fn delete_specialization(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<DeleteResult, DbErr> {
    specializations::Entity::delete_by_id(id).exec(db).await
}
