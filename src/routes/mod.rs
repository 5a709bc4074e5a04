pub mod auth;

pub mod matrix;

pub mod parameters;

pub mod finalization;

pub mod weeks;

pub mod groups;

pub mod students;

pub mod resources;

pub mod frontend;

pub use auth::configure_auth_routes;
pub use finalization::configure_finalization_routes;
pub use frontend::configure_frontend_routes;
pub use groups::configure_group_routes;
pub use matrix::configure_matrix_routes;
pub use parameters::configure_parameter_routes;
pub use resources::configure_resource_routes;
pub use students::configure_student_routes;
pub use weeks::configure_week_routes;
