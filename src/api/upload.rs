/// Media upload endpoint
///
/// Accepts a multipart form with a `file` part and stores its bytes in the
/// object store under `<epoch-millis>-<original file name>`. The file name is
/// used verbatim; the object store is responsible for keeping arbitrary keys
/// safe on its own medium.

use crate::{
    api::error::ApiError,
    platform::Platform,
    storage::PutOptions,
};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    response::Json,
    routing::post,
    Router,
};
use serde::Serialize;

const FILE_FIELD: &str = "file";
const UPLOAD_FAILED: &str = "Upload failed";

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Key the object was stored under
    pub key: String,
}

/// File part pulled out of the form
#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

/// Create upload routes with the given request body limit
pub fn create_upload_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Storage key for a file uploaded at `millis`
pub fn object_key(millis: i64, file_name: &str) -> String {
    format!("{}-{}", millis, file_name)
}

/// Upload a file
///
/// POST /api/upload
/// Body: multipart/form-data with a `file` part
/// Returns: { "success": true, "message": "File uploaded successfully", "key": "..." }
async fn upload_file(
    platform: Platform,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Some(storage) = platform.storage.as_ref() else {
        return Err(ApiError::internal("Storage not configured"));
    };

    let mut multipart = multipart.map_err(|e| {
        tracing::error!("❌ Upload is not a readable multipart form: {}", e);
        ApiError::internal(UPLOAD_FAILED)
    })?;

    let file = match read_file_field(&mut multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => return Err(ApiError::bad_request("No file provided")),
        Err(e) => {
            tracing::error!("❌ Failed to read upload body: {}", e);
            return Err(ApiError::internal(UPLOAD_FAILED));
        }
    };

    let key = object_key(platform.now_millis(), &file.file_name);
    tracing::debug!(
        "📤 Storing {} ({} bytes, {:?})",
        key,
        file.data.len(),
        file.content_type
    );

    let options = PutOptions {
        content_type: file.content_type,
    };
    if let Err(e) = storage.put(&key, file.data, options).await {
        tracing::error!("❌ Upload error for {}: {}", key, e);
        return Err(ApiError::internal(UPLOAD_FAILED));
    }

    tracing::info!("✅ Uploaded {} to {} storage", key, storage.backend());

    Ok(Json(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        key,
    }))
}

/// Find the first `file` part that carries a file name and read it whole
///
/// Plain text fields named `file` are skipped, so a form without an actual
/// file yields `None`. A part with an empty file name (what browsers send
/// when no file was picked) still counts as a file: it is stored as an empty
/// object under `<millis>-`.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedFile>, axum::extract::multipart::MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?.to_vec();

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}
