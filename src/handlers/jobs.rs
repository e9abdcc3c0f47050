use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::{ensure_owner_or_admin, require_client};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::jobs as job_db;
use crate::error::{ApiError, ApiResult};
use crate::models::job_listings::{CreateJobListing, JobListQuery, JobStatus, UpdateJobListing};

const MAX_JOB_IMAGES: usize = 10;

fn validate_images(images: &[String]) -> ApiResult<()> {
    if images.len() > MAX_JOB_IMAGES {
        return Err(ApiError::bad_request(format!(
            "A job listing can have at most {MAX_JOB_IMAGES} images"
        )));
    }
    Ok(())
}

fn validate_budget(budget: Option<f64>) -> ApiResult<()> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => {
            Err(ApiError::bad_request("budget must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// GET /api/jobs?craftsman_type=&status=&city=&page=&limit=
pub async fn get_jobs(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<JobListQuery>,
) -> ApiResult<HttpResponse> {
    let jobs = job_db::list_jobs(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job listing {id} not found")))?;
    Ok(HttpResponse::Ok().json(job))
}

/// GET /api/jobs/client/{client_id}
pub async fn get_jobs_by_client(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let jobs = job_db::get_jobs_by_client(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// POST /api/jobs: clients only.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateJobListing>,
) -> ApiResult<HttpResponse> {
    require_client(&user.0, "post jobs")?;
    let input = body.into_inner();

    if input.title.trim().is_empty() || input.description.trim().is_empty() {
        return Err(ApiError::bad_request("title and description are required"));
    }
    validate_images(&input.images)?;
    validate_budget(input.budget)?;

    let job = job_db::insert_job(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Created().json(job))
}

/// PUT /api/jobs/{id}: owner or admin.
pub async fn update_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateJobListing>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let input = body.into_inner();
    authorize_job(&db, &user, id).await?;

    if let Some(images) = &input.images {
        validate_images(images)?;
    }
    validate_budget(input.budget)?;

    let updated = job_db::update_job(db.get_ref(), id, input)
        .await
        .map_err(ApiError::from_db)?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/jobs/{id}/close: owner or admin.
pub async fn close_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    authorize_job(&db, &user, id).await?;

    let closed = job_db::set_status(db.get_ref(), id, JobStatus::Closed)
        .await
        .map_err(ApiError::from_db)?;
    Ok(HttpResponse::Ok().json(closed))
}

/// DELETE /api/jobs/{id}: owner or admin.
pub async fn delete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    authorize_job(&db, &user, id).await?;

    job_db::delete_job(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Job listing {id} deleted"),
    })))
}

async fn authorize_job(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
    id: Uuid,
) -> ApiResult<()> {
    let job = job_db::get_job_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Job listing {id} not found")))?;
    ensure_owner_or_admin(&user.0, job.client_id, "job listing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use crate::models::job_listings;
    use crate::models::profiles::{self, Roles};

    fn viewer() -> AuthenticatedUser {
        AuthenticatedUser(profiles::Model {
            id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
            first_name: None,
            last_name: None,
            phone: None,
            role: Roles::Professional,
            craftsman_type: None,
            description: None,
            address: None,
            city: None,
            county: None,
            latitude: None,
            longitude: None,
            avatar_url: None,
            subscription_active: false,
            subscription_end_date: None,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    #[test]
    fn caps_image_count() {
        let images: Vec<String> = (0..=MAX_JOB_IMAGES).map(|i| format!("{i}.png")).collect();
        assert!(validate_images(&images).is_err());
        assert!(validate_images(&images[..MAX_JOB_IMAGES]).is_ok());
    }

    #[test]
    fn rejects_negative_or_nan_budget() {
        assert!(validate_budget(Some(-1.0)).is_err());
        assert!(validate_budget(Some(f64::NAN)).is_err());
        assert!(validate_budget(Some(250.0)).is_ok());
        assert!(validate_budget(None).is_ok());
    }

    #[actix_web::test]
    async fn missing_job_renders_not_found_body() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<job_listings::Model>::new()])
            .into_connection();

        let Err(err) = get_job(viewer(), web::Data::new(db), web::Path::from(id)).await else {
            panic!("expected a missing job to be an error");
        };
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], format!("Job listing {id} not found"));
    }

    #[actix_web::test]
    async fn list_failure_is_a_server_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();

        let client_id = web::Path::from(Uuid::new_v4());
        let Err(err) = get_jobs_by_client(viewer(), web::Data::new(db), client_id).await else {
            panic!("expected the database failure to surface");
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
