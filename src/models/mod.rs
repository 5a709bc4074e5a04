pub mod auth;
pub mod common;
pub mod finalization;
pub mod groups;
pub mod matrix;
pub mod parameters;
pub mod projects;
pub mod students;
pub mod users;
pub mod weeks;

pub use common::{ApiResponse, ErrorCode};
