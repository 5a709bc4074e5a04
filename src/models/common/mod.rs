pub mod datetime;
pub mod error_code;
pub mod number;
pub mod response;

pub use error_code::ErrorCode;
pub use response::ApiResponse;
