pub mod auth;
pub mod logging;

pub use auth::{AuthContext, require_auth, require_organization, require_user};
pub use logging::logging_middleware;
