use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Answers whether a laminate front face has directional grain.
pub trait GrainLookup {
    fn wood_grains_enabled(&self, front_code: &str) -> bool;
}

impl GrainLookup for HashMap<String, bool> {
    fn wood_grains_enabled(&self, front_code: &str) -> bool {
        self.get(front_code).copied().unwrap_or(false)
    }
}

/// Laminate code → wood-grain flag, as kept in the material master data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrainPreferences {
    codes: HashMap<String, bool>,
}

impl GrainPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, code: impl Into<String>, enabled: bool) {
        self.codes.insert(code.into(), enabled);
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Builds preferences from laminate catalog entries. Later entries win.
    pub fn from_catalog<'a>(entries: impl IntoIterator<Item = &'a LaminateEntry>) -> Self {
        let mut prefs = Self::new();
        for entry in entries {
            prefs.set(entry.code.trim(), entry.wood_grains_enabled);
        }
        prefs
    }

    /// Overlays `other` on top of `self`.
    pub fn merge(&mut self, other: &GrainPreferences) {
        for (code, enabled) in &other.codes {
            self.codes.insert(code.clone(), *enabled);
        }
    }
}

impl GrainLookup for GrainPreferences {
    fn wood_grains_enabled(&self, front_code: &str) -> bool {
        self.codes.wood_grains_enabled(front_code)
    }
}

impl<const N: usize> From<[(&str, bool); N]> for GrainPreferences {
    fn from(pairs: [(&str, bool); N]) -> Self {
        let mut prefs = Self::new();
        for (code, enabled) in pairs {
            prefs.set(code, enabled);
        }
        prefs
    }
}

/// One laminate record from the material catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaminateEntry {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Stored as `"true"`/`"false"` by the catalog service, sometimes as a bool.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub wood_grains_enabled: bool,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// The face code used for grain lookup: first `+`-separated segment, trimmed.
pub fn front_face(laminate_code: &str) -> &str {
    laminate_code.trim().split('+').next().unwrap_or_default().trim()
}
