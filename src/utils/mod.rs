pub mod coalesce;
pub mod file_magic;
pub mod parameter_error_handler;
pub mod validate;

pub use coalesce::RequestCoalescer;
pub use file_magic::{file_extension, validate_magic_bytes};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
