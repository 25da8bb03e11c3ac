use serde::{Deserialize, Deserializer, Serialize};

/// Width/height pair in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Logical position of a panel inside a cabinet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PanelRole {
    Top,
    Bottom,
    Left,
    Right,
    Back,
    Other,
}

impl PanelRole {
    pub const ALL: [PanelRole; 6] = [
        PanelRole::Top,
        PanelRole::Bottom,
        PanelRole::Left,
        PanelRole::Right,
        PanelRole::Back,
        PanelRole::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PanelRole::Top => "TOP",
            PanelRole::Bottom => "BOTTOM",
            PanelRole::Left => "LEFT",
            PanelRole::Right => "RIGHT",
            PanelRole::Back => "BACK",
            PanelRole::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for PanelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A panel as it arrives from the UI or a job file.
///
/// Every field is optional and loosely typed. Aliases (`nomW`/`width`/`w`)
/// are kept apart here and only resolved by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPanel {
    #[serde(default, deserialize_with = "deserialize_lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub nom_w: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub nom_h: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string", skip_serializing_if = "Option::is_none")]
    pub laminate_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_strict_true")]
    pub gaddi: bool,

    // Display backfill, only written when explicitly enabled.
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub display_w: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64", skip_serializing_if = "Option::is_none")]
    pub display_h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wood_grains_enabled: Option<bool>,
}

impl RawPanel {
    pub fn named(name: &str, w: f64, h: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            width: Some(w),
            height: Some(h),
            ..Default::default()
        }
    }

    pub fn with_laminate(mut self, code: &str) -> Self {
        self.laminate_code = Some(code.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_gaddi(mut self, gaddi: bool) -> Self {
        self.gaddi = gaddi;
        self
    }
}

/// Optimizer-ready part record.
///
/// Nominal dimensions and role are fixed at construction. Only the placed
/// geometry changes afterwards, through [`NormalizedPart::apply_placement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPart {
    id: String,
    name: String,
    #[serde(rename = "panelType")]
    role: PanelRole,
    nom_w: f64,
    nom_h: f64,
    w: f64,
    h: f64,
    qty: u32,
    #[serde(rename = "rotate")]
    rotation_allowed: bool,
    #[serde(rename = "gaddi")]
    marking_requested: bool,
    laminate_code: String,
    #[serde(rename = "woodGrainsEnabled")]
    grain_locked: bool,
}

impl NormalizedPart {
    pub(crate) fn new(
        id: String,
        name: String,
        role: PanelRole,
        nominal: Rect,
        laminate_code: String,
        grain_locked: bool,
        marking_requested: bool,
    ) -> Self {
        Self {
            id,
            name,
            role,
            nom_w: nominal.w,
            nom_h: nominal.h,
            w: nominal.w,
            h: nominal.h,
            qty: 1,
            // Permissive until the rotation resolver runs.
            rotation_allowed: true,
            marking_requested,
            laminate_code,
            grain_locked,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> PanelRole {
        self.role
    }

    pub fn nominal(&self) -> Rect {
        Rect::new(self.nom_w, self.nom_h)
    }

    pub fn placed(&self) -> Rect {
        Rect::new(self.w, self.h)
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    pub fn grain_locked(&self) -> bool {
        self.grain_locked
    }

    pub fn rotation_allowed(&self) -> bool {
        self.rotation_allowed
    }

    pub fn marking_requested(&self) -> bool {
        self.marking_requested
    }

    pub fn laminate_code(&self) -> &str {
        &self.laminate_code
    }

    pub(crate) fn set_rotation_allowed(&mut self, allowed: bool) {
        self.rotation_allowed = allowed;
    }

    /// Record the geometry the optimizer chose for this part.
    ///
    /// Swapping a rotation-locked part is accepted but logged; the part keeps
    /// whatever geometry the optimizer reports.
    pub fn apply_placement(&mut self, placed: Rect) {
        if !self.rotation_allowed && is_swapped(self.nominal(), placed) {
            tracing::warn!(
                id = %self.id,
                nominal = %self.nominal(),
                placed = %placed,
                "optimizer rotated a grain-locked part"
            );
        }
        self.w = placed.w;
        self.h = placed.h;
    }
}

fn is_swapped(nominal: Rect, placed: Rect) -> bool {
    nominal.w != nominal.h && placed == nominal.rotated()
}

/// Geometry hand-back from the optimizer for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPlacement {
    pub id: String,
    pub w: f64,
    pub h: f64,
}

/// Accepts a JSON number or a numeric string; anything else reads as absent.
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// Accepts a JSON string or number; anything else reads as absent.
pub fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Only the JSON literal `true` counts as set.
pub fn deserialize_strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value == serde_json::Value::Bool(true))
}
