//! Image upload routes: staged uploads, file records, and product media.
//!
//! Uploads go direct to storage: the API reserves staged targets, the
//! caller POSTs the binary to the returned URL with the returned form
//! parameters, then registers the `resourceUrl` as a shop file or attaches
//! it to a product as media.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use prolanding_core::ShopId;

use crate::error::AppError;
use crate::shopify::client::check_user_errors;
use crate::shopify::queries;
use crate::state::AppState;

/// One file to stage for upload.
#[derive(Debug, Deserialize)]
pub struct StagedFileRequest {
    pub filename: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

/// Request body for reserving staged upload targets.
#[derive(Debug, Deserialize)]
pub struct StagedUploadRequest {
    pub shop_id: ShopId,
    pub files: Vec<StagedFileRequest>,
}

/// A reserved upload target. The caller POSTs the binary to `url` with
/// `parameters` as form fields, then uses `resource_url` in a file or
/// media creation call.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    pub parameters: Vec<StagedParameter>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct StagedParameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct StagedUploadResponse {
    pub targets: Vec<StagedTarget>,
}

/// Request body for registering an uploaded resource as a shop file.
#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub shop_id: ShopId,
    /// `resource_url` from a completed staged upload.
    pub resource_url: String,
}

#[derive(Debug, Serialize)]
pub struct CreateFileResponse {
    pub id: String,
    pub file_status: Option<String>,
    /// Preview URL; absent while the file is still processing.
    pub url: Option<String>,
}

/// One image to attach to a product.
#[derive(Debug, Deserialize)]
pub struct MediaInput {
    /// Staged `resource_url` or an external image URL.
    pub source: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Request body for attaching media to a product.
#[derive(Debug, Deserialize)]
pub struct AttachMediaRequest {
    pub shop_id: ShopId,
    pub media: Vec<MediaInput>,
}

#[derive(Debug, Serialize)]
pub struct AttachMediaResponse {
    pub media: Vec<Value>,
}

/// Reserve staged upload targets for the given files.
#[instrument(skip(state, request), fields(shop = %request.shop_id, files = request.files.len()))]
pub async fn staged_upload(
    State(state): State<AppState>,
    Json(request): Json<StagedUploadRequest>,
) -> Result<Json<StagedUploadResponse>, AppError> {
    if request.files.is_empty() {
        return Err(AppError::BadRequest("files must not be empty".to_string()));
    }

    let input: Vec<Value> = request
        .files
        .iter()
        .map(|file| {
            json!({
                "filename": file.filename,
                "mimeType": file.mime_type,
                "resource": "IMAGE",
                "httpMethod": "POST",
            })
        })
        .collect();

    let data = state
        .shopify()
        .request(
            request.shop_id,
            queries::STAGED_UPLOADS_CREATE,
            json!({ "input": input }),
        )
        .await?;
    check_user_errors(&data, "stagedUploadsCreate")?;

    let targets = parse_staged_targets(&data);
    if targets.is_empty() {
        return Err(AppError::Internal(
            "no staged targets in upload response".to_string(),
        ));
    }

    Ok(Json(StagedUploadResponse { targets }))
}

/// Register a completed staged upload as a shop file.
#[instrument(skip(state, request), fields(shop = %request.shop_id))]
pub async fn create_file(
    State(state): State<AppState>,
    Json(request): Json<CreateFileRequest>,
) -> Result<Json<CreateFileResponse>, AppError> {
    let data = state
        .shopify()
        .request(
            request.shop_id,
            queries::FILE_CREATE,
            json!({
                "files": [{
                    "originalSource": request.resource_url,
                    "contentType": "IMAGE",
                }],
            }),
        )
        .await?;
    check_user_errors(&data, "fileCreate")?;

    let file = data
        .pointer("/fileCreate/files/0")
        .ok_or_else(|| AppError::Internal("no file in create response".to_string()))?;

    Ok(Json(CreateFileResponse {
        id: file
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::Internal("file id missing from create response".to_string()))?
            .to_string(),
        file_status: file
            .get("fileStatus")
            .and_then(Value::as_str)
            .map(str::to_string),
        url: file
            .pointer("/preview/image/url")
            .and_then(Value::as_str)
            .map(str::to_string),
    }))
}

/// Attach images to a product as media.
#[instrument(skip(state, request), fields(shop = %request.shop_id, product = %id))]
pub async fn attach(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AttachMediaRequest>,
) -> Result<Json<AttachMediaResponse>, AppError> {
    if request.media.is_empty() {
        return Err(AppError::BadRequest("media must not be empty".to_string()));
    }

    let media: Vec<Value> = request.media.iter().map(media_create_input).collect();

    let data = state
        .shopify()
        .request(
            request.shop_id,
            queries::PRODUCT_CREATE_MEDIA,
            json!({
                "productId": super::products::product_gid(&id),
                "media": media,
            }),
        )
        .await?;
    check_user_errors(&data, "productCreateMedia")?;

    Ok(Json(AttachMediaResponse {
        media: data
            .pointer("/productCreateMedia/media")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }))
}

/// Fold the staged target nodes into the response model.
fn parse_staged_targets(data: &Value) -> Vec<StagedTarget> {
    data.pointer("/stagedUploadsCreate/stagedTargets")
        .and_then(Value::as_array)
        .map(|targets| {
            targets
                .iter()
                .filter_map(|target| {
                    Some(StagedTarget {
                        url: target.get("url")?.as_str()?.to_string(),
                        resource_url: target.get("resourceUrl")?.as_str()?.to_string(),
                        parameters: target
                            .get("parameters")
                            .and_then(Value::as_array)
                            .map(|params| {
                                params
                                    .iter()
                                    .filter_map(|p| {
                                        Some(StagedParameter {
                                            name: p.get("name")?.as_str()?.to_string(),
                                            value: p.get("value")?.as_str()?.to_string(),
                                        })
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Build one `CreateMediaInput` object.
fn media_create_input(input: &MediaInput) -> Value {
    let mut media = json!({
        "originalSource": input.source,
        "mediaContentType": "IMAGE",
    });
    if let (Some(map), Some(alt)) = (media.as_object_mut(), &input.alt) {
        map.insert("alt".into(), json!(alt));
    }
    media
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_staged_targets() {
        let data = json!({
            "stagedUploadsCreate": {
                "stagedTargets": [
                    {
                        "url": "https://storage.example.com/upload",
                        "resourceUrl": "https://storage.example.com/files/tee.jpg",
                        "parameters": [
                            { "name": "key", "value": "tmp/tee.jpg" },
                            { "name": "policy", "value": "abc123" }
                        ]
                    }
                ],
                "userErrors": []
            }
        });

        let targets = parse_staged_targets(&data);
        assert_eq!(targets.len(), 1);
        let target = targets.first().expect("target");
        assert_eq!(target.url, "https://storage.example.com/upload");
        assert_eq!(
            target.resource_url,
            "https://storage.example.com/files/tee.jpg"
        );
        assert_eq!(target.parameters.len(), 2);
        assert_eq!(
            target.parameters.first().expect("parameter"),
            &StagedParameter {
                name: "key".to_string(),
                value: "tmp/tee.jpg".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_staged_targets_empty_on_missing_payload() {
        assert!(parse_staged_targets(&json!({})).is_empty());
    }

    #[test]
    fn test_media_create_input_includes_alt_when_present() {
        let with_alt = media_create_input(&MediaInput {
            source: "https://cdn.example.com/tee.jpg".to_string(),
            alt: Some("Front view".to_string()),
        });
        assert_eq!(with_alt["originalSource"], "https://cdn.example.com/tee.jpg");
        assert_eq!(with_alt["mediaContentType"], "IMAGE");
        assert_eq!(with_alt["alt"], "Front view");

        let without_alt = media_create_input(&MediaInput {
            source: "https://cdn.example.com/tee.jpg".to_string(),
            alt: None,
        });
        assert!(without_alt.get("alt").is_none());
    }
}
