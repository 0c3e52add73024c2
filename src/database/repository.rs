use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ProjectFilter, SortOrder};
use crate::project::{EmbeddedImage, NewProject, Project, UpdateProject};
use crate::types::ProjectId;

use super::manager::{DatabaseError, DatabaseManager};
use super::store::ProjectStore;

const COLUMNS: &str = r#""id", "title", "description", "tech", "github_url", "demo_url", "featured", "order", "cover_image", "created_at", "updated_at""#;

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    title: String,
    description: String,
    tech: Vec<String>,
    github_url: String,
    demo_url: String,
    featured: bool,
    order: i64,
    cover_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: ProjectId::from(row.id),
            title: row.title,
            description: row.description,
            tech: row.tech,
            github_url: row.github_url,
            demo_url: row.demo_url,
            featured: row.featured,
            order: row.order,
            cover_image: row.cover_image.map(EmbeddedImage::from_stored),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed project store
pub struct PgProjectRepository {
    db: DatabaseManager,
}

impl PgProjectRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn select_sql(filter: &ProjectFilter, order: &SortOrder) -> String {
        format!(
            "SELECT {} FROM \"projects\" {} {}",
            COLUMNS,
            filter.generate(1),
            order.generate()
        )
    }

    /// Absent fields bind NULL and keep the stored column
    fn update_sql() -> String {
        format!(
            "UPDATE \"projects\" SET \
             \"title\" = COALESCE($2, \"title\"), \
             \"description\" = COALESCE($3, \"description\"), \
             \"tech\" = COALESCE($4, \"tech\"), \
             \"github_url\" = COALESCE($5, \"github_url\"), \
             \"demo_url\" = COALESCE($6, \"demo_url\"), \
             \"featured\" = COALESCE($7, \"featured\"), \
             \"order\" = COALESCE($8, \"order\"), \
             \"cover_image\" = COALESCE($9, \"cover_image\"), \
             \"updated_at\" = now() \
             WHERE \"id\" = $1 \
             RETURNING {COLUMNS}"
        )
    }
}

#[async_trait]
impl ProjectStore for PgProjectRepository {
    async fn create(&self, project: NewProject) -> Result<Project, DatabaseError> {
        let project = project.into_project(ProjectId::generate(), Utc::now());

        let sql = format!(
            "INSERT INTO \"projects\" ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(project.id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.tech)
            .bind(&project.github_url)
            .bind(&project.demo_url)
            .bind(project.featured)
            .bind(project.order)
            .bind(project.cover_image.as_ref().map(EmbeddedImage::as_str))
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.into())
    }

    async fn find(&self, filter: &ProjectFilter, order: &SortOrder) -> Result<Vec<Project>, DatabaseError> {
        let sql = Self::select_sql(filter, order);
        let mut query = sqlx::query_as::<_, ProjectRow>(&sql);
        if let Some(pattern) = filter.like_pattern() {
            query = query.bind(pattern);
        }

        let rows = query.fetch_all(self.db.pool()).await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM \"projects\" WHERE \"id\" = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(Project::from))
    }

    async fn update_by_id(&self, id: ProjectId, changes: &UpdateProject) -> Result<Option<Project>, DatabaseError> {
        let sql = Self::update_sql();
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.tech.as_deref())
            .bind(changes.github_url.as_deref())
            .bind(changes.demo_url.as_deref())
            .bind(changes.featured)
            .bind(changes.order)
            .bind(changes.cover_image.as_ref().map(EmbeddedImage::as_str))
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(Project::from))
    }

    async fn delete_by_id(&self, id: ProjectId) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM \"projects\" WHERE \"id\" = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_without_search_has_no_where() {
        let sql = PgProjectRepository::select_sql(&ProjectFilter::all(), &SortOrder::display());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY \"featured\" DESC, \"order\" ASC, \"created_at\" DESC"));
    }

    #[test]
    fn select_with_search_binds_first_param() {
        let sql = PgProjectRepository::select_sql(
            &ProjectFilter::search(Some("rust")),
            &SortOrder::display(),
        );
        assert!(sql.contains("WHERE \"title\" ILIKE $1"));
        assert!(!sql.contains("$2"));
    }

    #[test]
    fn update_keeps_columns_the_patch_leaves_out() {
        let sql = PgProjectRepository::update_sql();
        for (param, column) in [
            (2, "title"),
            (3, "description"),
            (4, "tech"),
            (5, "github_url"),
            (6, "demo_url"),
            (7, "featured"),
            (8, "order"),
            (9, "cover_image"),
        ] {
            let assignment = format!("\"{column}\" = COALESCE(${param}, \"{column}\")");
            assert!(sql.contains(&assignment), "missing {assignment}");
        }
        assert!(sql.contains("\"updated_at\" = now()"));
        assert!(sql.contains("WHERE \"id\" = $1"));
    }
}
