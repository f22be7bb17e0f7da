//! Reclamation trigger configuration.

use serde::{Deserialize, Serialize};

/// Settings for the expired-share reclamation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclaimConfig {
    /// Shared secret expected as `Authorization: Bearer <secret>` on the
    /// HTTP trigger. When unset the trigger refuses every request.
    #[serde(default)]
    pub secret: Option<String>,
    /// Whether the in-process cron schedule runs the pass.
    #[serde(default = "default_true")]
    pub schedule_enabled: bool,
    /// Six-field cron expression (seconds first).
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

impl Default for ReclaimConfig {
    fn default() -> Self {
        Self {
            secret: None,
            schedule_enabled: default_true(),
            schedule: default_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule() -> String {
    "0 */5 * * * *".to_string()
}
