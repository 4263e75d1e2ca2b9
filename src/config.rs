use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{JenkinsError, Result};

/// Build request loaded from a YAML file.
///
/// ```yaml
/// job: folder1/myjob
/// params:
///   BRANCH: main
///   CLEAN: "true"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Job name, folders separated with `/`.
    pub job: String,

    /// Build parameters in file order.
    #[serde(default)]
    pub params: IndexMap<String, String>,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            JenkinsError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            JenkinsError::Config(format!("Invalid YAML in {}: {e}", path.display()))
        })
    }

    /// Applies `name=value` overrides on top of the file's parameters.
    pub fn override_params(&mut self, overrides: &[String]) -> Result<()> {
        for entry in overrides {
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                JenkinsError::Config(format!("Invalid parameter '{entry}', expected name=value"))
            })?;
            self.params.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    pub fn params_vec(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
