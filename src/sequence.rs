use crate::normalize::mentions_role;
use crate::types::{NormalizedPart, PanelRole};

/// Sort buckets, lowest first. Checked back-first, which differs from the
/// order used to assign a part's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortGroup {
    Back = 1,
    Left = 2,
    Right = 3,
    Top = 4,
    Bottom = 5,
    Other = 6,
}

impl SortGroup {
    pub fn of_name(name: &str) -> SortGroup {
        const ORDER: [(PanelRole, SortGroup); 5] = [
            (PanelRole::Back, SortGroup::Back),
            (PanelRole::Left, SortGroup::Left),
            (PanelRole::Right, SortGroup::Right),
            (PanelRole::Top, SortGroup::Top),
            (PanelRole::Bottom, SortGroup::Bottom),
        ];
        ORDER
            .iter()
            .find(|(role, _)| mentions_role(name, *role))
            .map(|(_, group)| *group)
            .unwrap_or(SortGroup::Other)
    }
}

/// Orders parts by sort group, then by nominal area, largest first.
/// The sort is stable, so equal keys keep their input order.
pub fn sequence(parts: Vec<NormalizedPart>) -> Vec<NormalizedPart> {
    let mut keyed: Vec<(SortGroup, NormalizedPart)> = parts
        .into_iter()
        .map(|p| (SortGroup::of_name(p.name()), p))
        .collect();
    keyed.sort_by(|(ga, a), (gb, b)| {
        ga.cmp(gb)
            .then_with(|| b.nominal().area().total_cmp(&a.nominal().area()))
    });
    keyed.into_iter().map(|(_, p)| p).collect()
}
