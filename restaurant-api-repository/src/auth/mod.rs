//! Credential scaffolding for the HTTP layer.
//!
//! The restaurant API does not authenticate requests itself. It owns a
//! `Credentials` registry and, at setup, registers a JWT plugin configured
//! from the local secrets file. The HTTP layer asks the registry to
//! authenticate bearer tokens on protected routes.

mod credentials;
mod jwt;
mod secrets;

pub use credentials::{Credentials, CredentialsPlugin, UserProfile};
pub use jwt::{JwtClaims, JwtCredentials, JWT_PLUGIN_NAME};
pub use secrets::{load_secrets, setup_auth, JWT_SECRET_KEY};
