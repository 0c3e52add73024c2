use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProjectId;

/// A showcase project as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    /// Empty string means "not set"
    pub github_url: String,
    pub demo_url: String,
    pub featured: bool,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<EmbeddedImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated project that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub github_url: String,
    pub demo_url: String,
    pub featured: bool,
    pub order: i64,
    pub cover_image: Option<EmbeddedImage>,
}

impl NewProject {
    /// Materialize with the identity and timestamp the store assigned
    pub fn into_project(self, id: ProjectId, now: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            tech: self.tech,
            github_url: self.github_url,
            demo_url: self.demo_url,
            featured: self.featured,
            order: self.order,
            cover_image: self.cover_image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Image bytes inlined as a `data:<mime>;base64,<payload>` URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddedImage(String);

impl EmbeddedImage {
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
    }

    /// Wrap a value previously produced by [`EmbeddedImage::encode`] and read back from storage
    pub fn from_stored(data_url: String) -> Self {
        Self(data_url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, _)| mime)
    }

    pub fn decode(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.0.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }
}
