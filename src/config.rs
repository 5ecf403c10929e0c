//! Configuration of the import pipeline.  All values have defaults matching the behavior of the
//! profile designer's degree 9 output, and can be overridden through a TOML file.

use crate::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the profile store when no explicit path is configured
pub const DEFAULT_STORE_FILE: &str = "airfoil_data.json";

/// How the parser reacts when a profile does not have `expected_degree + 1` points per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DegreePolicy {
    /// Reject the profile with a `DegreeMismatch` error
    Strict,

    /// Continue with the degree implied by the point count and report a warning
    #[default]
    Adaptive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Location of the profile store file, `None` selects the default in the home directory
    pub store_path: Option<PathBuf>,

    /// Degree handling for profiles with an unexpected point count
    pub degree_policy: DegreePolicy,

    /// The spline degree the profile files are expected to have
    pub expected_degree: usize,

    /// Conversion factor applied to a driving dimension before it drives the root parameter.
    /// The host works in centimeters internally while dimensions are entered in millimeters.
    pub unit_factor: f64,

    /// Length unit of the placement parameters and of the driving dimension
    pub length_unit: String,

    /// Chord length (internal units) used when the reference selection does not define one
    pub default_chord: f64,

    /// Geometric tolerance for degenerate reference detection
    pub tolerance: f64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            degree_policy: DegreePolicy::Adaptive,
            expected_degree: 9,
            unit_factor: 0.1,
            length_unit: "mm".to_string(),
            default_chord: 10.0,
            tolerance: 1e-9,
        }
    }
}

impl ImportConfig {
    /// Load the configuration from a TOML file. A missing or broken file is not an error, the
    /// defaults are used instead and the reason is logged.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Configuration file is invalid, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No configuration file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ImportError::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ImportError::Config(e.to_string()))?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// The effective store path: the configured one, or the store file in the user's home
    /// directory (`HOME`, then `USERPROFILE`), or the working directory as a last resort.
    pub fn resolved_store_path(&self) -> PathBuf {
        if let Some(path) = &self.store_path {
            return path.clone();
        }

        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(DEFAULT_STORE_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}
