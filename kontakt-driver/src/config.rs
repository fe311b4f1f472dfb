//! Parses dashboard configuration files.

use crate::store::DEFAULT_KEY;
use kontakt::SubmissionPolicy;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Key the contact list is stored under.
    pub storage_key: String,
    pub policy: SubmissionPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            storage_key: DEFAULT_KEY.into(),
            policy: SubmissionPolicy::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
    ) -> Result<DashboardConfig, Box<dyn std::error::Error + Send + Sync + 'static>> {
        Ok(serde_json::from_str(&read_to_string(path)?)?)
    }
}
