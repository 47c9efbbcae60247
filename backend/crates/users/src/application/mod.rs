//! Application Layer
//!
//! Directory use cases. Creation reuses `auth::application::CreateUserUseCase`.

pub mod delete_user;
pub mod get_user;
pub mod update_user;

pub use delete_user::DeleteUserUseCase;
pub use get_user::{GetUserUseCase, ListUsersUseCase};
pub use update_user::{UpdateUserInput, UpdateUserUseCase};
