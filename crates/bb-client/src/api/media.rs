use bb_types::records::Media;
use tracing::info;

use crate::{
    client::ApiClient, error::{ClientError, ClientResult}, resource::{RestResource, decode_list}, transport::{FilePart, Method, MultipartForm, RequestBody}
};

pub const MEDIA_PATH: &str = "/v1/media";

/// Multipart field the backend reads the file from.
pub const FILE_FIELD: &str = "file";

/// A photo or document to attach to a child.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub child_id: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub caption: Option<String>,
}

impl MediaUpload {
    fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::default().text("childID", self.child_id);
        if let Some(caption) = self.caption.filter(|c| !c.trim().is_empty()) {
            form = form.text("caption", caption);
        }
        form.file(FilePart {
            field: FILE_FIELD.to_string(),
            file_name: self.file_name,
            content_type: self.content_type,
            bytes: self.bytes,
        })
    }
}

/// Media records are created by upload and never edited in place.
#[derive(Clone)]
pub struct MediaApi {
    resource: RestResource<Media>,
}

impl MediaApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            resource: RestResource::new(client, MEDIA_PATH).empty_on_not_found(),
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<Media>> {
        self.resource.list().await
    }

    pub async fn by_child(&self, child_id: &str) -> ClientResult<Vec<Media>> {
        self.resource.list_by("child", &[("childID", child_id)]).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Media> {
        self.resource.get(id).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.resource.delete(id).await
    }

    /// `POST /v1/media` as `multipart/form-data`.
    pub async fn upload(&self, upload: MediaUpload) -> ClientResult<Media> {
        let client = self.resource.client();
        client.require_token()?;
        let mut errors = bb_types::FieldErrors::new();
        bb_types::validation::require(&mut errors, "childID", &upload.child_id);
        if upload.bytes.is_empty() {
            errors.insert(FILE_FIELD.to_string(), bb_types::ValidationError::Required);
        }
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }

        let url = client.url(MEDIA_PATH, None, &[])?;
        let (child_id, file_name, size) = (upload.child_id.clone(), upload.file_name.clone(), upload.bytes.len());
        let payload = client
            .send(Method::Post, url, RequestBody::Multipart(upload.into_form()))
            .await?;
        info!(child_id, file_name, size, "media uploaded");

        Ok(decode_list::<Media>(payload)?.into_iter().next().unwrap_or_else(|| Media {
            child_id: Some(child_id),
            ..Default::default()
        }))
    }
}
