use async_trait::async_trait;

use crate::filter::{ProjectFilter, SortOrder};
use crate::project::{NewProject, Project, UpdateProject};
use crate::types::ProjectId;

use super::manager::DatabaseError;

/// Persistence seam for projects.
///
/// Implementations own identity and timestamps: `create` assigns a fresh id
/// and `created_at`, `update_by_id` refreshes `updated_at`. Each call is a
/// single atomic operation; there is no cross-call transaction.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, project: NewProject) -> Result<Project, DatabaseError>;

    async fn find(&self, filter: &ProjectFilter, order: &SortOrder) -> Result<Vec<Project>, DatabaseError>;

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DatabaseError>;

    /// Apply only the fields `changes` carries, in one write. `None` when the id
    /// no longer exists.
    async fn update_by_id(&self, id: ProjectId, changes: &UpdateProject) -> Result<Option<Project>, DatabaseError>;

    /// `true` when a record was removed
    async fn delete_by_id(&self, id: ProjectId) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release connections; the store must not be used afterwards
    async fn close(&self);

    fn backend(&self) -> &'static str;
}
