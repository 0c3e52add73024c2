use super::model::EmbeddedImage;
use super::validate::FieldViolation;

/// Multipart field name carrying the cover image
pub const IMAGE_FIELD: &str = "image";

pub const DEFAULT_MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// An uploaded file held in request memory.
///
/// `size` counts every byte received; `bytes` stops growing once the reader
/// passes its cap, so an oversized upload is never fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
    pub size: usize,
}

impl ImageUpload {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self {
            content_type: Some(content_type.into()),
            file_name: None,
            bytes,
            size,
        }
    }
}

/// Size and type gate for uploads, plus the embedding step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePolicy {
    pub max_bytes: usize,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ImagePolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    pub fn check(&self, upload: &ImageUpload) -> Result<(), FieldViolation> {
        let declared = upload.content_type.as_deref().map(str::trim).unwrap_or("");
        if !ACCEPTED_IMAGE_TYPES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(declared))
        {
            return Err(FieldViolation::new(
                IMAGE_FIELD,
                "image must be a JPEG, PNG or WebP file",
            ));
        }

        if upload.size > self.max_bytes || upload.bytes.len() > self.max_bytes {
            return Err(FieldViolation::new(
                IMAGE_FIELD,
                format!("image must be at most {} bytes", self.max_bytes),
            ));
        }

        Ok(())
    }

    /// Inline an accepted upload as a data URL, keeping the declared MIME type as sent.
    /// No upload yields `None`; callers keep whatever cover image they already had.
    pub fn embed(&self, upload: Option<&ImageUpload>) -> Result<Option<EmbeddedImage>, FieldViolation> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        self.check(upload)?;

        let mime_type = upload.content_type.as_deref().map(str::trim).unwrap_or_default();
        Ok(Some(EmbeddedImage::encode(mime_type, &upload.bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn embeds_png_as_data_url() {
        let policy = ImagePolicy::default();
        let upload = ImageUpload::new("image/png", PNG_HEADER.to_vec());
        let image = policy.embed(Some(&upload)).unwrap().unwrap();
        assert!(image.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(image.decode().unwrap(), PNG_HEADER.to_vec());
    }

    #[test]
    fn declared_type_is_matched_case_insensitively_and_kept_verbatim() {
        let policy = ImagePolicy::default();
        let upload = ImageUpload::new("Image/WebP", vec![1, 2, 3]);
        let image = policy.embed(Some(&upload)).unwrap().unwrap();
        assert_eq!(image.mime_type(), Some("Image/WebP"));
    }

    #[test]
    fn rejects_non_image_types() {
        let policy = ImagePolicy::default();
        for declared in ["text/plain", "image/gif", "image/svg+xml", ""] {
            let upload = ImageUpload::new(declared, vec![1]);
            let err = policy.embed(Some(&upload)).unwrap_err();
            assert_eq!(err.field, "image", "{declared}");
        }

        let untyped = ImageUpload {
            content_type: None,
            file_name: Some("cover.png".to_string()),
            bytes: vec![1],
            size: 1,
        };
        assert!(policy.check(&untyped).is_err());
    }

    #[test]
    fn size_cap_is_inclusive() {
        let policy = ImagePolicy::default();
        let at_cap = ImageUpload::new("image/jpeg", vec![0; DEFAULT_MAX_IMAGE_BYTES]);
        assert!(policy.check(&at_cap).is_ok());

        let over = ImageUpload::new("image/jpeg", vec![0; DEFAULT_MAX_IMAGE_BYTES + 1]);
        assert!(policy.check(&over).is_err());
    }

    #[test]
    fn truncated_upload_is_judged_by_received_size() {
        let policy = ImagePolicy::new(4);
        let upload = ImageUpload {
            content_type: Some("image/png".to_string()),
            file_name: None,
            bytes: vec![0; 4],
            size: 9,
        };
        assert!(policy.check(&upload).is_err());
    }

    #[test]
    fn no_upload_embeds_nothing() {
        assert_eq!(ImagePolicy::default().embed(None).unwrap(), None);
    }
}
