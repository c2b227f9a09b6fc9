pub mod handlers;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtKeys, TokenError};
pub use middleware::{AuthUser, auth_middleware, require_admin};
