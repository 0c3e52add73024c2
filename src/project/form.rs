use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::image::ImageUpload;
use super::model::{EmbeddedImage, NewProject, Project};
use super::normalize::{normalize_text, normalize_url};
use super::validate::{
    coerce_boolean, coerce_integer, coerce_tech, coerce_text, Violations, CREATE_RULES,
    DEMO_URL, DESCRIPTION, FEATURED, GITHUB_URL, ORDER, TECH, TITLE, UPDATE_RULES,
};

/// Request fields exactly as they arrived, before any typing.
///
/// JSON bodies keep their value types; multipart text parts arrive as strings,
/// and a repeated part name collects into a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFields(BTreeMap<String, Value>);

impl ProjectFields {
    pub fn from_json(map: Map<String, Value>) -> Self {
        Self(map.into_iter().collect())
    }

    /// Add a multipart text part. `tech[]` style names are folded into `tech`.
    pub fn insert_text(&mut self, name: &str, text: String) {
        let name = name.strip_suffix("[]").unwrap_or(name).to_string();
        match self.0.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(Value::String(text));
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Value::Array(items) => items.push(Value::String(text)),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(text)]);
                }
            },
        }
    }

    /// Present, non-null value for `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(coerce_text)
    }

    fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(coerce_integer)
    }

    fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(coerce_boolean)
    }

    fn tech(&self) -> Option<Vec<String>> {
        self.get(TECH).and_then(coerce_tech)
    }
}

/// Request body of a create or update: typed-later fields plus an optional upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub fields: ProjectFields,
    pub upload: Option<ImageUpload>,
}

impl ProjectForm {
    pub fn from_fields(fields: ProjectFields) -> Self {
        Self {
            fields,
            upload: None,
        }
    }

    pub fn with_upload(mut self, upload: ImageUpload) -> Self {
        self.upload = Some(upload);
        self
    }
}

/// Validated create request
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub tech: Vec<String>,
    pub github_url: String,
    pub demo_url: String,
    pub featured: bool,
    pub order: i64,
}

impl CreateProject {
    pub fn parse(fields: &ProjectFields) -> Result<Self, Violations> {
        CREATE_RULES.validate(fields).into_result()?;

        Ok(Self {
            title: fields.text(TITLE).map(normalize_text).unwrap_or_default(),
            description: fields.text(DESCRIPTION).map(normalize_text).unwrap_or_default(),
            tech: fields.tech().unwrap_or_default(),
            github_url: fields.text(GITHUB_URL).map(normalize_url).unwrap_or_default(),
            demo_url: fields.text(DEMO_URL).map(normalize_url).unwrap_or_default(),
            featured: fields.boolean(FEATURED).unwrap_or(false),
            order: fields.integer(ORDER).unwrap_or(0),
        })
    }

    pub fn into_new_project(self, cover_image: Option<EmbeddedImage>) -> NewProject {
        NewProject {
            title: self.title,
            description: self.description,
            tech: self.tech,
            github_url: self.github_url,
            demo_url: self.demo_url,
            featured: self.featured,
            order: self.order,
            cover_image,
        }
    }
}

/// Validated partial update, applied by the store as a patch. `None` means
/// "leave the stored value alone", which covers both absent fields and present
/// fields of the wrong type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tech: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub featured: Option<bool>,
    pub order: Option<i64>,
    pub cover_image: Option<EmbeddedImage>,
}

impl UpdateProject {
    pub fn parse(fields: &ProjectFields) -> Result<Self, Violations> {
        UPDATE_RULES.validate(fields).into_result()?;

        Ok(Self {
            title: fields.text(TITLE).map(normalize_text),
            description: fields.text(DESCRIPTION).map(normalize_text),
            tech: fields.tech(),
            github_url: fields.text(GITHUB_URL).map(normalize_url),
            demo_url: fields.text(DEMO_URL).map(normalize_url),
            featured: fields.boolean(FEATURED),
            order: fields.integer(ORDER),
            cover_image: None,
        })
    }

    /// Replace the cover only when an accepted upload came with the request
    pub fn with_cover_image(mut self, cover_image: Option<EmbeddedImage>) -> Self {
        self.cover_image = cover_image;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite only the fields this update carries
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(tech) = &self.tech {
            project.tech = tech.clone();
        }
        if let Some(github_url) = &self.github_url {
            project.github_url = github_url.clone();
        }
        if let Some(demo_url) = &self.demo_url {
            project.demo_url = demo_url.clone();
        }
        if let Some(featured) = self.featured {
            project.featured = featured;
        }
        if let Some(order) = self.order {
            project.order = order;
        }
        if let Some(cover_image) = &self.cover_image {
            project.cover_image = Some(cover_image.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectId;
    use chrono::Utc;
    use serde_json::json;

    fn fields(value: Value) -> ProjectFields {
        match value {
            Value::Object(map) => ProjectFields::from_json(map),
            _ => panic!("fixture must be an object"),
        }
    }

    fn stored() -> Project {
        NewProject {
            title: "Original".to_string(),
            description: "Original description".to_string(),
            tech: vec!["rust".to_string()],
            github_url: "https://github.com/example/original".to_string(),
            demo_url: String::new(),
            featured: true,
            order: 4,
            cover_image: Some(EmbeddedImage::encode("image/png", &[1, 2, 3])),
        }
        .into_project(ProjectId::generate(), Utc::now())
    }

    #[test]
    fn create_applies_defaults_and_normalizes() {
        let input = CreateProject::parse(&fields(json!({
            "title": "  Folio  ",
            "description": "  A portfolio backend  ",
            "tech": "rust, axum ,, sqlx",
        })))
        .unwrap();

        assert_eq!(input.title, "Folio");
        assert_eq!(input.description, "A portfolio backend");
        assert_eq!(input.tech, vec!["rust", "axum", "sqlx"]);
        assert_eq!(input.github_url, "");
        assert_eq!(input.demo_url, "");
        assert!(!input.featured);
        assert_eq!(input.order, 0);
    }

    #[test]
    fn multipart_parts_collect_repeated_names() {
        let mut f = ProjectFields::default();
        f.insert_text("tech[]", " rust".to_string());
        f.insert_text("tech", "tokio ".to_string());
        f.insert_text("tech", "".to_string());
        f.insert_text("order", "3".to_string());
        assert_eq!(f.get("tech"), Some(&json!([" rust", "tokio ", ""])));
        assert_eq!(f.tech(), Some(vec!["rust".to_string(), "tokio".to_string()]));
        assert_eq!(f.integer("order"), Some(3));
    }

    #[test]
    fn null_counts_as_absent() {
        let f = fields(json!({ "title": null }));
        assert!(f.get("title").is_none());
        assert!(CreateProject::parse(&f).is_err());
    }

    #[test]
    fn title_only_update_leaves_everything_else() {
        let before = stored();
        let mut after = before.clone();
        UpdateProject::parse(&fields(json!({ "title": "New" })))
            .unwrap()
            .apply_to(&mut after);

        assert_eq!(after.title, "New");
        assert_eq!(after.description, before.description);
        assert_eq!(after.tech, before.tech);
        assert_eq!(after.featured, before.featured);
        assert_eq!(after.order, before.order);
        assert_eq!(after.cover_image, before.cover_image);
    }

    #[test]
    fn wrong_typed_update_fields_are_no_ops() {
        let before = stored();
        let mut after = before.clone();
        let update = UpdateProject::parse(&fields(json!({
            "order": "not-a-number",
            "featured": "sometimes",
            "tech": 5,
        })))
        .unwrap();
        assert!(update.is_empty());
        update.apply_to(&mut after);
        assert_eq!(after, before);
    }

    #[test]
    fn update_can_clear_urls_and_flags() {
        let mut project = stored();
        UpdateProject::parse(&fields(json!({
            "githubUrl": "",
            "featured": "false",
            "order": 0,
            "tech": [],
        })))
        .unwrap()
        .apply_to(&mut project);

        assert_eq!(project.github_url, "");
        assert!(!project.featured);
        assert_eq!(project.order, 0);
        assert!(project.tech.is_empty());
    }
}
