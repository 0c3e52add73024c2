pub mod form;
pub mod image;
pub mod model;
pub mod normalize;
pub mod service;
pub mod validate;

pub use form::{CreateProject, ProjectFields, ProjectForm, UpdateProject};
pub use image::{ImagePolicy, ImageUpload, ACCEPTED_IMAGE_TYPES, DEFAULT_MAX_IMAGE_BYTES, IMAGE_FIELD};
pub use model::{EmbeddedImage, NewProject, Project};
pub use normalize::normalize_tech;
pub use service::{ProjectError, ProjectService};
pub use validate::{FieldViolation, Violations};
