pub mod auth;

pub use auth::{jwt_auth_middleware, optional_viewer, AuthUser};
