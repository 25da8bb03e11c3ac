use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grain::{GrainPreferences, LaminateEntry};
use crate::types::{PartPlacement, RawPanel};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Panels plus the material data needed to prepare them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub panels: Vec<RawPanel>,
    #[serde(default)]
    pub wood_grains: GrainPreferences,
    #[serde(default)]
    pub laminates: Vec<LaminateEntry>,
}

impl Job {
    /// Catalog flags overlaid with the explicit `woodGrains` map.
    pub fn grain_preferences(&self) -> GrainPreferences {
        let mut prefs = GrainPreferences::from_catalog(&self.laminates);
        prefs.merge(&self.wood_grains);
        prefs
    }
}

pub fn load_job(path: &Path) -> Result<Job, InputError> {
    read_json(path)
}

pub fn load_placements(path: &Path) -> Result<Vec<PartPlacement>, InputError> {
    read_json(path)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
