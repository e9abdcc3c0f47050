use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::storage::{Bucket, MAX_UPLOAD_BYTES, StorageClient, object_path, sanitize_filename};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// POST /api/uploads/{bucket}?filename=<name>
///
/// Raw request body, `Content-Type` set to the file's type. Returns the public URL.
pub async fn upload(
    user: AuthenticatedUser,
    req: HttpRequest,
    storage: web::Data<StorageClient>,
    path: web::Path<String>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let bucket: Bucket = path.into_inner().parse().map_err(ApiError::BadRequest)?;

    let content_type = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .ok_or_else(|| ApiError::bad_request("Content-Type header is required"))?;

    if !bucket.allows(&content_type) {
        return Err(ApiError::bad_request(format!(
            "{content_type} files are not accepted in {bucket}"
        )));
    }
    if body.is_empty() {
        return Err(ApiError::bad_request("Upload body is empty"));
    }
    if body.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request("Upload exceeds 10 MB"));
    }

    let filename = sanitize_filename(&query.filename)
        .ok_or_else(|| ApiError::bad_request("filename is invalid"))?;
    let object = object_path(user.0.id, &filename);

    let url = storage
        .upload(bucket, &object, &content_type, body.to_vec())
        .await
        .map_err(ApiError::External)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "bucket": bucket.as_str(),
        "path": object,
        "url": url,
    })))
}
