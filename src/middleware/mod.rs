pub mod auth;
pub mod extract;
pub mod form;
pub mod response;

pub use auth::AuthSubject;
pub use extract::{ApiPath, ApiQuery};
pub use response::{ApiResponse, ApiResult};
