//! Credential plugin registry.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Identity extracted from an accepted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Stable user identifier.
    pub id: String,
    /// Display name, when the credential carries one.
    pub display_name: Option<String>,
    /// Name of the plugin that accepted the credential.
    pub provider: String,
}

/// A way of turning a bearer token into a user.
pub trait CredentialsPlugin: Send + Sync {
    /// Short name identifying the plugin, e.g. "jwt".
    fn name(&self) -> &str;

    /// Validate `token` and return the user it identifies.
    ///
    /// # Returns
    ///
    /// * `Ok(UserProfile)` - If the token is accepted
    /// * `Err(ApiError::AuthError)` - If the token is rejected
    fn authenticate(&self, token: &str) -> Result<UserProfile, ApiError>;
}

/// Ordered set of credential plugins.
#[derive(Clone, Default)]
pub struct Credentials {
    plugins: Vec<Arc<dyn CredentialsPlugin>>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Plugins are tried in registration order.
    pub fn register(&mut self, plugin: Arc<dyn CredentialsPlugin>) {
        self.plugins.push(plugin);
    }

    /// Names of the registered plugins, in registration order.
    pub fn plugins(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Authenticate `token` against each plugin in turn.
    ///
    /// # Returns
    ///
    /// * `Ok(UserProfile)` - From the first plugin that accepts the token
    /// * `Err(ApiError::AuthError)` - If no plugin is registered or all reject it
    pub fn authenticate(&self, token: &str) -> Result<UserProfile, ApiError> {
        if self.plugins.is_empty() {
            return Err(ApiError::auth("No credentials plugin registered"));
        }

        let mut last_error = None;
        for plugin in &self.plugins {
            match plugin.authenticate(token) {
                Ok(profile) => return Ok(profile),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::auth("Token rejected")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("plugins", &self.plugins())
            .finish()
    }
}
