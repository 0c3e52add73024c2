use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::filter::{ProjectFilter, SortOrder};
use crate::project::{NewProject, Project, UpdateProject};
use crate::types::ProjectId;

use super::manager::DatabaseError;
use super::store::ProjectStore;

/// Process-local project store for development and tests.
///
/// Records are kept in insertion order. Listing walks them newest-first before
/// the stable sort, so creation-time ties still come out newest-first.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<Vec<Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn create(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let mut projects = self.projects.write().await;

        let mut id = ProjectId::generate();
        while projects.iter().any(|p| p.id == id) {
            id = ProjectId::generate();
        }

        let project = project.into_project(id, Utc::now());
        projects.push(project.clone());
        Ok(project)
    }

    async fn find(&self, filter: &ProjectFilter, order: &SortOrder) -> Result<Vec<Project>, DatabaseError> {
        let projects = self.projects.read().await;
        let mut found: Vec<Project> = projects
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        order.sort(&mut found);
        Ok(found)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DatabaseError> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn update_by_id(&self, id: ProjectId, changes: &UpdateProject) -> Result<Option<Project>, DatabaseError> {
        let mut projects = self.projects.write().await;
        let Some(slot) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        changes.apply_to(slot);
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }

    async fn delete_by_id(&self, id: ProjectId) -> Result<bool, DatabaseError> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {
        let count = self.projects.read().await.len();
        info!("Discarding in-memory store ({} projects)", count);
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
