//! Session authentication: cookie tokens and password hashing

mod jwt;
mod password;

pub use jwt::{JwtService, SessionClaims};
pub use password::{hash_password, verify_password, PasswordService};
