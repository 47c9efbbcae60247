//! Value Object Module

pub mod email;
pub mod profile_text;
pub mod refresh_token;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use kernel::id::{SessionId, UserId};
