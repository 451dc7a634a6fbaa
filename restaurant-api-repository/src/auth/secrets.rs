//! Secrets file loading and authentication setup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use super::credentials::Credentials;
use super::jwt::JwtCredentials;
use crate::errors::ApiError;

/// Key of the JWT signing secret in the secrets file.
pub const JWT_SECRET_KEY: &str = "JWT_Secret";

/// Read the secrets file: a JSON object mapping names to string values.
///
/// # Arguments
///
/// * `path` - Location of the secrets file
///
/// # Returns
///
/// * `Ok(HashMap<String, String>)` - The secrets
/// * `Err(ApiError::ParseError)` - If the file is missing or is not a flat
///   object of strings
pub fn load_secrets(path: &Path) -> Result<HashMap<String, String>, ApiError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ApiError::parse(format!(
            "Could not read secrets file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        ApiError::parse(format!(
            "Could not convert secrets file {} to a dictionary: {}",
            path.display(),
            e
        ))
    })
}

/// Register the JWT plugin on `credentials` using the secret in `path`.
///
/// A missing or malformed secrets file, or one without a `JWT_Secret` entry,
/// is logged and auth setup is skipped; it never aborts start-up.
///
/// # Returns
///
/// `true` if the JWT plugin was registered.
pub fn setup_auth(credentials: &mut Credentials, path: &Path) -> bool {
    let secrets = match load_secrets(path) {
        Ok(secrets) => secrets,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Could not get secrets file");
            return false;
        }
    };

    let Some(secret) = secrets.get(JWT_SECRET_KEY).filter(|s| !s.is_empty()) else {
        error!(path = %path.display(), key = JWT_SECRET_KEY, "Could not get secret");
        return false;
    };

    credentials.register(Arc::new(JwtCredentials::new(secret)));
    info!(plugins = ?credentials.plugins(), "Registered JWT credentials");
    true
}
