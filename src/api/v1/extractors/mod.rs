pub mod auth_ctx;
pub mod payload;

pub use auth_ctx::AuthCaller;
pub use payload::{ChatIdPath, JsonBody};
