mod auth;
pub use auth::*;

mod audit;
pub use audit::*;
