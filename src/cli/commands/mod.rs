pub mod projects;
pub mod serve;
pub mod token;
