use sea_orm::*;
use uuid::Uuid;

use crate::models::job_listings::{self, CreateJobListing, JobListQuery, JobStatus, UpdateJobListing};

fn images_json(images: Vec<String>) -> serde_json::Value {
    serde_json::Value::from(images)
}

/// Insert a new job listing (always starts `open`).
pub async fn insert_job(
    db: &DatabaseConnection,
    client_id: Uuid,
    input: CreateJobListing,
) -> Result<job_listings::Model, DbErr> {
    let new_job = job_listings::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        title: Set(input.title),
        description: Set(input.description),
        craftsman_type: Set(input.craftsman_type),
        city: Set(input.city),
        county: Set(input.county),
        address: Set(input.address),
        budget: Set(input.budget),
        images: Set(images_json(input.images)),
        status: Set(JobStatus::Open),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_job.insert(db).await
}

/// Filtered, paginated job board, newest first.
pub async fn list_jobs(
    db: &DatabaseConnection,
    query: &JobListQuery,
) -> Result<Vec<job_listings::Model>, DbErr> {
    let mut select = job_listings::Entity::find().order_by_desc(job_listings::Column::CreatedAt);

    if let Some(craftsman_type) = query.craftsman_type {
        select = select.filter(job_listings::Column::CraftsmanType.eq(craftsman_type));
    }
    if let Some(status) = query.status {
        select = select.filter(job_listings::Column::Status.eq(status));
    }
    if let Some(city) = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        select = select.filter(job_listings::Column::City.eq(city));
    }

    select
        .paginate(db, query.limit())
        .fetch_page(query.page() - 1)
        .await
}

pub async fn get_job_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<job_listings::Model>, DbErr> {
    job_listings::Entity::find_by_id(id).one(db).await
}

pub async fn get_jobs_by_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> Result<Vec<job_listings::Model>, DbErr> {
    job_listings::Entity::find()
        .filter(job_listings::Column::ClientId.eq(client_id))
        .order_by_desc(job_listings::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn update_job(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateJobListing,
) -> Result<job_listings::Model, DbErr> {
    let job = job_listings::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Job listing not found".to_string()))?;

    let mut active: job_listings::ActiveModel = job.into();

    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(craftsman_type) = input.craftsman_type {
        active.craftsman_type = Set(craftsman_type);
    }
    if let Some(city) = input.city {
        active.city = Set(Some(city));
    }
    if let Some(county) = input.county {
        active.county = Set(Some(county));
    }
    if let Some(address) = input.address {
        active.address = Set(Some(address));
    }
    if let Some(budget) = input.budget {
        active.budget = Set(Some(budget));
    }
    if let Some(images) = input.images {
        active.images = Set(images_json(images));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: JobStatus,
) -> Result<job_listings::Model, DbErr> {
    let job = job_listings::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Job listing not found".to_string()))?;

    let mut active: job_listings::ActiveModel = job.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn delete_job(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    job_listings::Entity::delete_by_id(id).exec(db).await
}

pub async fn count_open(db: &DatabaseConnection) -> Result<u64, DbErr> {
    job_listings::Entity::find()
        .filter(job_listings::Column::Status.eq(JobStatus::Open))
        .count(db)
        .await
}
