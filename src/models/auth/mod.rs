pub mod requests;
pub mod responses;

pub use requests::LoginRequest;
pub use responses::{LoginResponse, LoginResponseShape, LoginSession, RedirectResponse};
