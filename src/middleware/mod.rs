pub mod auth;
pub mod response;

pub use auth::{extract_bearer, jwt_auth_middleware, AuthUser};
pub use response::{reply, Envelope};
