//! GADDI edge marking: a dashed line drawn near a panel edge showing which
//! original dimension the panel carries after placement.
//!
//! LEFT/RIGHT panels always mark their nominal height, TOP/BOTTOM panels
//! their nominal width. The line follows that dimension onto whichever sheet
//! axis it ended up on, so a rotated panel still marks the same dimension.

use serde::{Deserialize, Serialize};

use crate::types::{NormalizedPart, Rect};

/// Panels with a placed side at or below this size get no marking.
pub const MIN_MARKED_SIDE: f64 = 15.0;
/// How close a placed side must be to the tracked dimension to count as it.
pub const AXIS_TOLERANCE: f64 = 0.5;

pub const INSET: f64 = 2.0;
pub const DASH_PATTERN: [f64; 2] = [2.0, 2.0];
pub const LINE_WIDTH: f64 = 0.5;
/// Neutral gray.
pub const COLOR: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkDimension {
    Width,
    Height,
}

/// `X` is horizontal on the sheet, `Y` vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetAxis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingConfig {
    pub mark_dimension: MarkDimension,
    pub sheet_axis: SheetAxis,
    pub inset: f64,
    pub dash_pattern: [f64; 2],
    pub line_width: f64,
    pub color: u8,
}

impl MarkingConfig {
    fn styled(mark_dimension: MarkDimension, sheet_axis: SheetAxis) -> Self {
        Self {
            mark_dimension,
            sheet_axis,
            inset: INSET,
            dash_pattern: DASH_PATTERN,
            line_width: LINE_WIDTH,
            color: COLOR,
        }
    }
}

/// A placed panel as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkingPanel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub panel_type: String,
    #[serde(default)]
    pub gaddi: bool,
    pub nom_w: f64,
    pub nom_h: f64,
    pub w: f64,
    pub h: f64,
}

impl MarkingPanel {
    pub fn nominal(&self) -> Rect {
        Rect::new(self.nom_w, self.nom_h)
    }

    pub fn placed(&self) -> Rect {
        Rect::new(self.w, self.h)
    }
}

impl From<&NormalizedPart> for MarkingPanel {
    fn from(part: &NormalizedPart) -> Self {
        let nominal = part.nominal();
        let placed = part.placed();
        Self {
            id: Some(part.id().to_string()),
            panel_type: part.role().label().to_string(),
            gaddi: part.marking_requested(),
            nom_w: nominal.w,
            nom_h: nominal.h,
            w: placed.w,
            h: placed.h,
        }
    }
}

pub fn should_show(gaddi: bool, placed: Rect) -> bool {
    gaddi && placed.w > MIN_MARKED_SIDE && placed.h > MIN_MARKED_SIDE
}

/// Which dimension to mark and which sheet axis it lies on.
///
/// `panel_type` is matched case-insensitively by substring, so labels such
/// as `"LEFT_1_p3"` work. When the placed width matches neither nominal side
/// the line falls back to the vertical axis.
pub fn line_direction(panel_type: &str, nominal: Rect, placed: Rect) -> MarkingConfig {
    let label = panel_type.to_uppercase();
    let tracked = if label.contains("LEFT") || label.contains("RIGHT") {
        Some((MarkDimension::Height, nominal.h))
    } else if label.contains("TOP") || label.contains("BOTTOM") {
        Some((MarkDimension::Width, nominal.w))
    } else {
        None
    };

    match tracked {
        Some((dimension, size)) => {
            let axis = if (placed.w - size).abs() < AXIS_TOLERANCE {
                SheetAxis::X
            } else {
                SheetAxis::Y
            };
            MarkingConfig::styled(dimension, axis)
        }
        None => MarkingConfig::styled(MarkDimension::Height, SheetAxis::Y),
    }
}

/// Marking for a placed panel, or `None` when it is not eligible.
pub fn resolve(panel: &MarkingPanel) -> Option<MarkingConfig> {
    if !should_show(panel.gaddi, panel.placed()) {
        return None;
    }
    Some(line_direction(&panel.panel_type, panel.nominal(), panel.placed()))
}

impl NormalizedPart {
    pub fn marking(&self) -> Option<MarkingConfig> {
        resolve(&MarkingPanel::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(panel_type: &str, nominal: (f64, f64), placed: (f64, f64)) -> MarkingPanel {
        MarkingPanel {
            id: None,
            panel_type: panel_type.to_string(),
            gaddi: true,
            nom_w: nominal.0,
            nom_h: nominal.1,
            w: placed.0,
            h: placed.1,
        }
    }

    #[test]
    fn test_left_rotated_onto_x() {
        let cfg = resolve(&panel("LEFT", (18.0, 600.0), (600.0, 18.0))).unwrap();
        assert_eq!(cfg.mark_dimension, MarkDimension::Height);
        assert_eq!(cfg.sheet_axis, SheetAxis::X);
    }

    #[test]
    fn test_left_upright_on_y() {
        let cfg = resolve(&panel("LEFT", (18.0, 600.0), (18.0, 600.0))).unwrap();
        assert_eq!(cfg.mark_dimension, MarkDimension::Height);
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
    }

    #[test]
    fn test_right_side_both_orientations() {
        let upright = resolve(&panel("right", (560.0, 720.0), (560.0, 720.0))).unwrap();
        assert_eq!(upright.mark_dimension, MarkDimension::Height);
        assert_eq!(upright.sheet_axis, SheetAxis::Y);

        let rotated = resolve(&panel("right", (560.0, 720.0), (720.0, 560.0))).unwrap();
        assert_eq!(rotated.sheet_axis, SheetAxis::X);
    }

    #[test]
    fn test_top_tracks_width() {
        let cfg = resolve(&panel("TOP", (800.0, 560.0), (800.0, 560.0))).unwrap();
        assert_eq!(cfg.mark_dimension, MarkDimension::Width);
        assert_eq!(cfg.sheet_axis, SheetAxis::X);

        let cfg = resolve(&panel("Bottom_2_x", (800.0, 560.0), (560.0, 800.0))).unwrap();
        assert_eq!(cfg.mark_dimension, MarkDimension::Width);
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
    }

    #[test]
    fn test_tolerance() {
        let cfg = line_direction("TOP", Rect::new(800.0, 560.0), Rect::new(800.4, 560.0));
        assert_eq!(cfg.sheet_axis, SheetAxis::X);
        let cfg = line_direction("TOP", Rect::new(800.0, 560.0), Rect::new(800.5, 560.0));
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
    }

    #[test]
    fn test_no_match_falls_back_to_y() {
        let cfg = line_direction("LEFT", Rect::new(300.0, 700.0), Rect::new(290.0, 690.0));
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
    }

    #[test]
    fn test_other_role_defaults() {
        let cfg = resolve(&panel("OTHER", (700.0, 400.0), (400.0, 700.0))).unwrap();
        assert_eq!(cfg.mark_dimension, MarkDimension::Height);
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
        let cfg = resolve(&panel("", (700.0, 400.0), (700.0, 400.0))).unwrap();
        assert_eq!(cfg.sheet_axis, SheetAxis::Y);
    }

    #[test]
    fn test_eligibility_gate() {
        let mut p = panel("LEFT", (300.0, 700.0), (300.0, 700.0));
        assert!(resolve(&p).is_some());

        p.gaddi = false;
        assert!(resolve(&p).is_none());

        p.gaddi = true;
        p.w = 15.0;
        assert!(resolve(&p).is_none());

        p.w = 300.0;
        p.h = 0.0;
        assert!(resolve(&p).is_none());

        p.h = 15.1;
        assert!(resolve(&p).is_some());
    }

    #[test]
    fn test_style_constants() {
        let cfg = resolve(&panel("TOP", (800.0, 560.0), (800.0, 560.0))).unwrap();
        assert_eq!(cfg.inset, 2.0);
        assert_eq!(cfg.dash_pattern, [2.0, 2.0]);
        assert_eq!(cfg.line_width, 0.5);
        assert_eq!(cfg.color, 100);
    }

    #[test]
    fn test_serialized_shape() {
        let cfg = line_direction("LEFT", Rect::new(18.0, 600.0), Rect::new(600.0, 18.0));
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["markDimension"], "height");
        assert_eq!(json["sheetAxis"], "x");
        assert_eq!(json["dashPattern"], serde_json::json!([2.0, 2.0]));
    }
}
