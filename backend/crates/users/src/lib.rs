//! User Directory Backend Module
//!
//! Read, update and delete user records behind the auth guards:
//! - `/admin/users` - full CRUD, admin tokens only
//! - `/api/users/{id}` - own record only, admins reach every record
//!
//! Storage and validation come from the `auth` crate.

pub mod application;
pub mod error;
pub mod presentation;

pub use error::{DirectoryError, DirectoryResult};
pub use presentation::router::{users_router, users_router_generic};
