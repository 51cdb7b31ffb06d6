//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// HTTP Basic authentication settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Realm sent in the `WWW-Authenticate` challenge
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Register the demo accounts (Admin, Alice, Boris, Cathy)
    #[serde(default)]
    pub seed_demo_users: bool,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Demo accounts have well-known passwords and are refused in production.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.realm.trim().is_empty() || self.realm.contains('"') {
            return Err(ValidationError::InvalidRealm);
        }
        if environment == Environment::Production && self.seed_demo_users {
            return Err(ValidationError::NotAllowedInProduction("auth.seed_demo_users"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            seed_demo_users: false,
        }
    }
}

fn default_realm() -> String {
    "beorders".to_string()
}
