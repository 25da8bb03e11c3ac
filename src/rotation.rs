use crate::types::{NormalizedPart, PanelRole};

/// Whether the optimizer may swap width and height for a panel.
///
/// Directional grain has to run the same real-world way on the finished
/// cabinet. LEFT/RIGHT sides fix height x depth, TOP/BOTTOM fix width x
/// depth, BACK panels are fixed as well. Every role ends up with the same
/// answer, including `Other`, so the role is not consulted.
pub fn rotation_allowed(_role: PanelRole, grain_locked: bool) -> bool {
    !grain_locked
}

pub fn apply(part: &mut NormalizedPart) {
    let allowed = rotation_allowed(part.role(), part.grain_locked());
    part.set_rotation_allowed(allowed);
}
