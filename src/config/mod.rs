use crate::error::{Result, RoutewardError};
use dashmap::DashMap;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const USER_ROLES: &str = "USER_ROLES";
pub const BIND_ADDR: &str = "BIND_ADDR";

const DEFAULT_ROLES: [&str; 2] = ["ROLE_USER", "ROLE_ADMIN"];
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration service
///
/// A snapshot of the process environment, after `.env` has been applied.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Load `.env` (when present) and snapshot the environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RoutewardError::Config(format!("{} is not set", key)))
    }

    pub fn database_url(&self) -> Result<String> {
        self.require(DATABASE_URL)
    }

    /// Roles offered by the user admin, from the comma separated `USER_ROLES`.
    pub fn user_roles(&self) -> Vec<String> {
        let roles: Vec<String> = self
            .get(USER_ROLES)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|role| !role.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if roles.is_empty() {
            DEFAULT_ROLES.iter().map(|role| role.to_string()).collect()
        } else {
            roles
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let raw = self
            .get(BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        raw.parse()
            .map_err(|e| RoutewardError::Config(format!("invalid {} '{}': {}", BIND_ADDR, raw, e)))
    }
}
