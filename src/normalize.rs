use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::grain::{GrainLookup, front_face};
use crate::types::{NormalizedPart, PanelRole, RawPanel, Rect};

static ROLE_WORDS: LazyLock<[(PanelRole, Regex); 5]> = LazyLock::new(|| {
    let word = |w: &str| Regex::new(&format!(r"\b{w}\b")).expect("invalid role regex");
    [
        (PanelRole::Top, word("top")),
        (PanelRole::Bottom, word("bottom")),
        (PanelRole::Left, word("left")),
        (PanelRole::Right, word("right")),
        (PanelRole::Back, word("back")),
    ]
});

/// True when `name` contains the role's keyword as a whole word.
/// "Back Panel" mentions back, "backrest" does not.
pub fn mentions_role(name: &str, role: PanelRole) -> bool {
    let lower = name.to_lowercase();
    ROLE_WORDS
        .iter()
        .find(|(r, _)| *r == role)
        .is_some_and(|(_, re)| re.is_match(&lower))
}

impl PanelRole {
    /// Detects the role from a panel name, testing top, bottom, left, right,
    /// back in that order.
    pub fn detect(name: &str) -> PanelRole {
        let lower = name.to_lowercase();
        ROLE_WORDS
            .iter()
            .find(|(_, re)| re.is_match(&lower))
            .map(|(role, _)| *role)
            .unwrap_or(PanelRole::Other)
    }
}

/// Converts raw panels into part records for a single preparation run.
///
/// Per-role id counters live here, so use one `Normalizer` per run.
pub struct Normalizer<'a, G: GrainLookup + ?Sized> {
    grain: &'a G,
    counters: HashMap<PanelRole, u32>,
}

impl<'a, G: GrainLookup + ?Sized> Normalizer<'a, G> {
    pub fn new(grain: &'a G) -> Self {
        Self {
            grain,
            counters: HashMap::new(),
        }
    }

    pub fn normalize(&mut self, raw: &RawPanel, index: usize) -> NormalizedPart {
        let name = raw
            .name
            .clone()
            .or_else(|| raw.id.clone())
            .unwrap_or_else(|| format!("panel-{index}"));
        let nominal = Rect::new(
            raw.nom_w.or(raw.width).or(raw.w).unwrap_or(0.0),
            raw.nom_h.or(raw.height).or(raw.h).unwrap_or(0.0),
        );
        let laminate_code = raw.laminate_code.as_deref().unwrap_or_default().trim().to_string();
        let grain_locked = self.grain.wood_grains_enabled(front_face(&laminate_code));

        let role = PanelRole::detect(&name);
        let counter = self.counters.entry(role).or_insert(0);
        *counter += 1;
        let id = match &raw.id {
            Some(original) => format!("{role}_{counter}_{original}"),
            None => format!("{role}_{counter}_idx{index}"),
        };

        tracing::trace!(%id, %role, %nominal, grain_locked, "normalized panel");

        NormalizedPart::new(id, name, role, nominal, laminate_code, grain_locked, raw.gaddi)
    }

    /// Same as [`Normalizer::normalize`], then writes display fields back onto
    /// the caller's panel.
    pub fn normalize_with_backfill(&mut self, raw: &mut RawPanel, index: usize) -> NormalizedPart {
        let part = self.normalize(raw, index);
        let nominal = part.nominal();
        raw.display_w = Some(nominal.w);
        raw.display_h = Some(nominal.h);
        raw.nom_w = Some(nominal.w);
        raw.nom_h = Some(nominal.h);
        raw.wood_grains_enabled = Some(part.grain_locked());
        part
    }

    pub fn counters(&self) -> &HashMap<PanelRole, u32> {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grain::GrainPreferences;

    #[test]
    fn test_detect_roles() {
        assert_eq!(PanelRole::detect("Top"), PanelRole::Top);
        assert_eq!(PanelRole::detect("cabinet BOTTOM shelf"), PanelRole::Bottom);
        assert_eq!(PanelRole::detect("Left Side"), PanelRole::Left);
        assert_eq!(PanelRole::detect("right-side"), PanelRole::Right);
        assert_eq!(PanelRole::detect("Back Panel"), PanelRole::Back);
        assert_eq!(PanelRole::detect("Shelf"), PanelRole::Other);
    }

    #[test]
    fn test_detect_whole_words_only() {
        assert_eq!(PanelRole::detect("backrest"), PanelRole::Other);
        assert_eq!(PanelRole::detect("tabletop"), PanelRole::Other);
        assert_eq!(PanelRole::detect("leftover"), PanelRole::Other);
        assert_eq!(PanelRole::detect("bottoms"), PanelRole::Other);
    }

    #[test]
    fn test_detect_first_match_wins() {
        // top is tested before back
        assert_eq!(PanelRole::detect("back top"), PanelRole::Top);
        assert_eq!(PanelRole::detect("left back"), PanelRole::Left);
    }

    #[test]
    fn test_mentions_role() {
        assert!(mentions_role("Left Back", PanelRole::Back));
        assert!(mentions_role("Left Back", PanelRole::Left));
        assert!(!mentions_role("backrest", PanelRole::Back));
        assert!(!mentions_role("anything", PanelRole::Other));
    }

    #[test]
    fn test_name_fallbacks() {
        let grain = GrainPreferences::new();
        let mut n = Normalizer::new(&grain);

        let by_id = n.normalize(&RawPanel { id: Some("p7".into()), ..Default::default() }, 0);
        assert_eq!(by_id.name(), "p7");

        let by_index = n.normalize(&RawPanel::default(), 3);
        assert_eq!(by_index.name(), "panel-3");
        assert_eq!(by_index.id(), "OTHER_2_idx3");
    }

    #[test]
    fn test_dimension_alias_precedence() {
        let grain = GrainPreferences::new();
        let mut n = Normalizer::new(&grain);
        let raw = RawPanel {
            nom_w: Some(100.0),
            width: Some(200.0),
            w: Some(300.0),
            height: Some(400.0),
            h: Some(500.0),
            ..Default::default()
        };
        assert_eq!(n.normalize(&raw, 0).nominal(), Rect::new(100.0, 400.0));

        let raw = RawPanel { w: Some(300.0), ..Default::default() };
        assert_eq!(n.normalize(&raw, 1).nominal(), Rect::new(300.0, 0.0));
    }

    #[test]
    fn test_grain_uses_front_face_only() {
        let grain = GrainPreferences::from([("L101", true), ("L202", true)]);
        let mut n = Normalizer::new(&grain);

        let front = n.normalize(&RawPanel::named("Top", 800.0, 600.0).with_laminate(" L101 + L999"), 0);
        assert!(front.grain_locked());
        assert_eq!(front.laminate_code(), "L101 + L999");

        let back_only = n.normalize(&RawPanel::named("Top", 800.0, 600.0).with_laminate("L999+L202"), 1);
        assert!(!back_only.grain_locked());

        let none = n.normalize(&RawPanel::named("Top", 800.0, 600.0), 2);
        assert!(!none.grain_locked());
    }

    #[test]
    fn test_unique_ids_per_role() {
        let grain = GrainPreferences::new();
        let mut n = Normalizer::new(&grain);
        let ids: Vec<String> = [
            RawPanel::named("Top", 1.0, 1.0).with_id("a"),
            RawPanel::named("Left", 1.0, 1.0).with_id("a"),
            RawPanel::named("Top", 1.0, 1.0).with_id("a"),
            RawPanel::named("Shelf", 1.0, 1.0),
        ]
        .iter()
        .enumerate()
        .map(|(i, raw)| n.normalize(raw, i).id().to_string())
        .collect();
        assert_eq!(ids, ["TOP_1_a", "LEFT_1_a", "TOP_2_a", "OTHER_1_idx3"]);
        assert_eq!(n.counters()[&PanelRole::Top], 2);
    }

    #[test]
    fn test_backfill_writes_display_fields() {
        let grain = GrainPreferences::from([("L1", true)]);
        let mut n = Normalizer::new(&grain);
        let mut raw = RawPanel {
            name: Some("Left".into()),
            w: Some(18.0),
            height: Some(720.0),
            laminate_code: Some("L1".into()),
            ..Default::default()
        };
        let part = n.normalize_with_backfill(&mut raw, 0);
        assert_eq!(raw.display_w, Some(18.0));
        assert_eq!(raw.display_h, Some(720.0));
        assert_eq!(raw.nom_w, Some(18.0));
        assert_eq!(raw.nom_h, Some(720.0));
        assert_eq!(raw.wood_grains_enabled, Some(true));
        assert_eq!(part.nominal(), Rect::new(18.0, 720.0));
    }

    #[test]
    fn test_gaddi_carried() {
        let grain = GrainPreferences::new();
        let mut n = Normalizer::new(&grain);
        let part = n.normalize(&RawPanel::named("Left", 18.0, 600.0).with_gaddi(true), 0);
        assert!(part.marking_requested());
    }
}
