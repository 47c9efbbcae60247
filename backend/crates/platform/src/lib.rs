//! Platform crate
//!
//! Technical building blocks with no domain knowledge:
//! - Argon2id password hashing and the password policy
//! - Random tokens and hashing helpers
//! - Cookie building and parsing

pub mod cookie;
pub mod crypto;
pub mod password;
