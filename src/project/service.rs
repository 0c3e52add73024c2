use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::auth::Subject;
use crate::database::{DatabaseError, ProjectStore};
use crate::filter::{ProjectFilter, SortOrder};
use crate::types::{Operation, ProjectId};

use super::form::{CreateProject, ProjectForm, UpdateProject};
use super::image::ImagePolicy;
use super::model::Project;
use super::validate::{FieldViolation, Violations};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Validation failed: {0}")]
    Validation(Violations),

    #[error("Project {0} not found")]
    NotFound(ProjectId),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<Violations> for ProjectError {
    fn from(violations: Violations) -> Self {
        ProjectError::Validation(violations)
    }
}

pub fn parse_id(raw: &str) -> Result<ProjectId, FieldViolation> {
    raw.parse()
        .map_err(|_| FieldViolation::new("id", "id must be a valid project id"))
}

/// Merge the outcome of every independent check into one violation list
fn collect_violations(
    id: Option<FieldViolation>,
    fields: Option<Violations>,
    image: Option<FieldViolation>,
) -> Violations {
    let mut violations = Violations::default();
    if let Some(v) = id {
        violations.push(v);
    }
    if let Some(v) = fields {
        violations.extend(v);
    }
    if let Some(v) = image {
        violations.push(v);
    }
    violations
}

/// Project resource operations.
///
/// Every check that can fail on input runs before the store is touched. Mutating
/// operations take a [`Subject`], so they cannot be reached without passing the
/// auth gate first.
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    images: ImagePolicy,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, images: ImagePolicy) -> Self {
        Self { store, images }
    }

    pub fn image_policy(&self) -> &ImagePolicy {
        &self.images
    }

    /// All projects, or those matching `query`, in listing order
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Project>, ProjectError> {
        let filter = ProjectFilter::search(query);
        let projects = self.store.find(&filter, &SortOrder::display()).await?;
        debug!(
            "{:?} {} projects (search: {:?})",
            Operation::Select,
            projects.len(),
            filter.query()
        );
        Ok(projects)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Project, ProjectError> {
        let id = parse_id(raw_id).map_err(Violations::from)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    pub async fn create(&self, subject: &Subject, form: ProjectForm) -> Result<Project, ProjectError> {
        let input = CreateProject::parse(&form.fields);
        let cover_image = self.images.embed(form.upload.as_ref());

        let (input, cover_image) = match (input, cover_image) {
            (Ok(input), Ok(cover_image)) => (input, cover_image),
            (input, cover_image) => {
                return Err(collect_violations(None, input.err(), cover_image.err()).into());
            }
        };

        let project = self.store.create(input.into_new_project(cover_image)).await?;
        info!(
            "{:?} project {} by {}",
            Operation::Create,
            project.id,
            subject.as_str()
        );
        Ok(project)
    }

    pub async fn update(
        &self,
        subject: &Subject,
        raw_id: &str,
        form: ProjectForm,
    ) -> Result<Project, ProjectError> {
        let id = parse_id(raw_id);
        let changes = UpdateProject::parse(&form.fields);
        let cover_image = self.images.embed(form.upload.as_ref());

        let (id, changes, cover_image) = match (id, changes, cover_image) {
            (Ok(id), Ok(changes), Ok(cover_image)) => (id, changes, cover_image),
            (id, changes, cover_image) => {
                return Err(collect_violations(id.err(), changes.err(), cover_image.err()).into());
            }
        };

        if self.store.find_by_id(id).await?.is_none() {
            return Err(ProjectError::NotFound(id));
        }

        let updated = self
            .store
            .update_by_id(id, &changes.with_cover_image(cover_image))
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        info!("{:?} project {} by {}", Operation::Update, id, subject.as_str());
        Ok(updated)
    }

    /// Permanently remove a project
    pub async fn delete(&self, subject: &Subject, raw_id: &str) -> Result<ProjectId, ProjectError> {
        let id = parse_id(raw_id).map_err(Violations::from)?;

        if !self.store.delete_by_id(id).await? {
            return Err(ProjectError::NotFound(id));
        }

        info!("{:?} project {} by {}", Operation::Delete, id, subject.as_str());
        Ok(id)
    }
}
