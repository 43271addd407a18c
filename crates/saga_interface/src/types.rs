//! Shared types for driver capabilities.

use serde::{Deserialize, Serialize};

/// Health status of a model backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthStatus {
    /// Backend is fully operational
    Healthy,
    /// Backend answers but something is off
    Degraded {
        /// Description of the degradation
        message: String,
    },
    /// Backend is not reachable or refuses requests
    Unhealthy {
        /// Description of the problem
        message: String,
    },
}

impl HealthStatus {
    /// Whether requests can be served at all.
    pub fn is_available(&self) -> bool {
        !matches!(self, HealthStatus::Unhealthy { .. })
    }
}
