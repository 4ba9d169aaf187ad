//! Authentication: register, login, JWT.

mod handlers;
mod jwt;
mod service;

pub use handlers::{login, register, LoginRequest, RegisterRequest};
pub use jwt::{Claims, JwtSecret};
pub use service::AuthAppService;
