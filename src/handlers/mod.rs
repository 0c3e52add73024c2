// handlers/mod.rs - HTTP handlers
//
// Reads are public; every mutating project route takes an `AuthSubject`
// as its first argument.
pub mod projects; // /api/projects[/:id]
pub mod system;   // / and /health

pub use projects::*;
pub use system::*;
