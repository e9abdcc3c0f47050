use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::config::SupabaseConfig;

/// Upload size cap for any bucket.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Raster image formats. SVG is excluded since uploads are served publicly.
const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Avatars,
    Portfolio,
    JobImages,
    Documents,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Portfolio => "portfolio",
            Bucket::JobImages => "job-images",
            Bucket::Documents => "documents",
        }
    }

    /// Content types each bucket accepts.
    pub fn allows(&self, content_type: &str) -> bool {
        let is_image = IMAGE_TYPES
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type));
        match self {
            Bucket::Documents => is_image || content_type.eq_ignore_ascii_case("application/pdf"),
            _ => is_image,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatars" => Ok(Bucket::Avatars),
            "portfolio" => Ok(Bucket::Portfolio),
            "job-images" => Ok(Bucket::JobImages),
            "documents" => Ok(Bucket::Documents),
            other => Err(format!("Unknown bucket {other}")),
        }
    }
}

/// Keep `[A-Za-z0-9._-]`, replace the rest, and never allow path traversal.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// `{owner}/{uuid}-{filename}` so uploads never collide.
pub fn object_path(owner: Uuid, filename: &str) -> String {
    format!("{owner}/{}-{filename}", Uuid::new_v4())
}

/// Supabase Storage over its REST API, authenticated with the service role key.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl StorageClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/storage/v1", config.url),
            service_role_key: config.service_role_key.clone(),
        }
    }

    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/object/public/{bucket}/{path}", self.base_url)
    }

    /// Upload bytes and return the object's public URL.
    pub async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String> {
        let response = self
            .client
            .post(format!("{}/object/{bucket}/{path}", self.base_url))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| format!("Failed to reach storage: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Storage upload failed: HTTP {status}: {body}"));
        }

        tracing::info!(%bucket, path, "stored upload");
        Ok(self.public_url(bucket, path))
    }
}
