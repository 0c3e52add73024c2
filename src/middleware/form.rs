use axum::{
    async_trait,
    extract::{
        multipart::{Field, Multipart, MultipartError},
        FromRequest, Request,
    },
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::project::{ImageUpload, ProjectFields, ProjectForm, IMAGE_FIELD};

/// Reads a create/update body.
///
/// `multipart/form-data` yields text fields plus the optional `image` part;
/// `application/json` yields the same fields without an upload. A request
/// with no body type is an empty form. Anything else is refused.
#[async_trait]
impl FromRequest<AppState> for ProjectForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase());

        match content_type.as_deref() {
            None | Some("") => Ok(ProjectForm::default()),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::invalid_body(e.body_text()))?;
                read_multipart(multipart, state.projects.image_policy().max_bytes).await
            }
            Some(ct) if ct.starts_with("application/json") => {
                let Json(map) = Json::<Map<String, Value>>::from_request(req, state)
                    .await
                    .map_err(|e| ApiError::invalid_body(e.body_text()))?;
                Ok(ProjectForm::from_fields(ProjectFields::from_json(map)))
            }
            Some(other) => Err(ApiError::bad_request(format!(
                "Unsupported content type '{}'; send multipart/form-data or application/json",
                other
            ))),
        }
    }
}

fn invalid_multipart(err: MultipartError) -> ApiError {
    ApiError::invalid_body(err.body_text())
}

async fn read_multipart(mut multipart: Multipart, max_image_bytes: usize) -> Result<ProjectForm, ApiError> {
    let mut form = ProjectForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let upload = read_upload(&mut field, max_image_bytes).await?;
            // Browsers send an empty, nameless part for an untouched file input
            if upload.size == 0 && upload.file_name.as_deref().unwrap_or("").is_empty() {
                continue;
            }
            form.upload = Some(upload);
        } else {
            let text = field.text().await.map_err(invalid_multipart)?;
            form.fields.insert_text(&name, text);
        }
    }

    Ok(form)
}

/// Buffer at most `max_bytes + 1` bytes while counting the full part size
async fn read_upload(field: &mut Field<'_>, max_bytes: usize) -> Result<ImageUpload, ApiError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);
    let mut bytes = Vec::new();
    let mut size = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(invalid_multipart)? {
        size += chunk.len();
        if bytes.len() <= max_bytes {
            let room = max_bytes + 1 - bytes.len();
            bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
    }

    Ok(ImageUpload {
        content_type,
        file_name,
        bytes,
        size,
    })
}
