//! Model — ValidatorConfig and CheckConfig.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::factory::MAX_OVERRUN_LIMIT;
use crate::format::DataFormatConfig;
use crate::validate::{ValidationContext, DEFAULT_STAGE_GROUP};

use super::ConfigError;

/// Host-side settings of the validator itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Root against which protobuf descriptor files are resolved.
    pub resources_dir: PathBuf,
    pub overrun_limit: i32,
    pub stage_group: String,
}

/// A complete check: validator settings plus the data format under test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub validator: ValidatorConfig,
    #[serde(default)]
    pub format: DataFormatConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("."),
            overrun_limit: MAX_OVERRUN_LIMIT,
            stage_group: DEFAULT_STAGE_GROUP.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Reject values no validation pass could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.overrun_limit <= 0 {
            return Err(ConfigError::Invalid("overrun_limit must be > 0".to_string()));
        }
        if self.stage_group.trim().is_empty() {
            return Err(ConfigError::Invalid("stage_group must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn context(&self) -> ValidationContext {
        ValidationContext::new(self.resources_dir.clone())
            .with_overrun_limit(self.overrun_limit)
            .with_stage_group(self.stage_group.clone())
    }
}
