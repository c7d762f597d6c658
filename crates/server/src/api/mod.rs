pub mod assignments;
pub mod doctors;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod patients;
pub mod routes;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
