// handlers/projects/mod.rs - Project resource handlers

pub mod collection; // GET, POST /api/projects
pub mod record;     // GET, PUT, DELETE /api/projects/:id

pub use collection::{projects_create, projects_list};
pub use record::{project_delete, project_show, project_update, DeletedProject};
