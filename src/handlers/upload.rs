use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AdminUser,
    error::{ApiError, ApiResult},
    models::{ApiResponse, UploadResponse},
    storage::sanitize_key,
};

/// Folder used when the form does not name one.
pub const DEFAULT_FOLDER: &str = "misc";

/// Accepted MIME types and the extension stored objects get. Anything else is refused.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("video/mp4", "mp4"),
    ("video/webm", "webm"),
    ("application/pdf", "pdf"),
    ("application/epub+zip", "epub"),
];

pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Reduces a client-supplied folder to lowercase `[a-z0-9_-]` segments.
pub fn sanitize_folder(raw: &str) -> String {
    let segments: Vec<String> = raw
        .split('/')
        .map(|segment| {
            segment
                .trim()
                .to_ascii_lowercase()
                .chars()
                .map(|c| match c {
                    'a'..='z' | '0'..='9' | '-' | '_' => c,
                    _ => '-',
                })
                .collect::<String>()
                .trim_matches('-')
                .to_string()
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        sanitize_key(&segments.join("/"))
    }
}

/// UploadForm
///
/// OpenAPI description of the multipart body; the handler reads the parts directly.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    /// Target folder, e.g. `news` or `ebooks/covers`.
    folder: Option<String>,
}

struct FilePart {
    content_type: String,
    bytes: Vec<u8>,
}

/// upload_file
///
/// [Admin Route] Stores one file from a multipart form (`file`, optional `folder`) and
/// returns its public URL. Objects land under `uploads/<folder>/<uuid>.<ext>`.
#[utoipa::path(
    post,
    path = "/api/admin/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored", body = UploadResponse),
        (status = 400, description = "No file, unsupported type or file too large"),
        (status = 403, description = "Not an admin"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn upload_file(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<UploadResponse>>)> {
    let max_bytes = state.config.max_upload_bytes;
    let mut folder = DEFAULT_FOLDER.to_string();
    let mut file: Option<FilePart> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "folder" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                folder = sanitize_folder(&raw);
            }
            "file" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                if extension_for(&content_type).is_none() {
                    return Err(ApiError::bad_request(format!(
                        "Unsupported file type: {content_type}"
                    )));
                }
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Could not read file: {}", e.body_text()))
                })?;
                file = Some(FilePart {
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if file.bytes.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }
    if file.bytes.len() > max_bytes {
        return Err(ApiError::bad_request(format!(
            "File too large. Maximum size is {} MB",
            max_bytes / 1024 / 1024
        )));
    }

    // Checked when the part was read.
    let ext = extension_for(&file.content_type).unwrap_or("bin");
    let key = format!("uploads/{}/{}.{}", folder, Uuid::new_v4(), ext);
    let size = file.bytes.len() as u64;

    let url = state
        .storage
        .upload(&key, &file.content_type, file.bytes)
        .await?;
    tracing::info!(admin_id = %admin.id, key = %key, size, "file uploaded");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            UploadResponse {
                url,
                key,
                size,
                content_type: file.content_type,
            },
            "File uploaded",
        )),
    ))
}
