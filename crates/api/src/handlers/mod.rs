pub mod auth;
pub mod health;
pub mod invitations;
pub mod organizations;
pub mod search;
pub mod shorts;
pub mod users;

pub use auth::AppState;
pub use health::healthz_handler;
