//! Shared kernel
//!
//! The small vocabulary every crate in the workspace agrees on:
//! - the application error type and its HTTP mapping
//! - typed numeric identifiers
//!
//! Nothing here knows about users, sessions or tokens.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
