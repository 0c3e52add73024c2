pub mod manager;
pub mod memory;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryProjectStore;
pub use repository::PgProjectRepository;
pub use store::ProjectStore;
