//! Application Layer
//!
//! Use cases and application services.

pub mod bootstrap;
pub mod config;
pub mod create_user;
pub mod refresh;
pub mod services;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use bootstrap::{AdminSeed, EnsureAdminUseCase};
pub use config::{AuthConfig, HashCost};
pub use create_user::{CreateUserInput, CreateUserUseCase};
pub use refresh::RefreshUseCase;
pub use services::AuthServices;
pub use sign_in::{SignInInput, SignInUseCase, TokenPair};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{AccessTokenCodec, VerifiedAccess};

#[cfg(test)]
mod tests;
