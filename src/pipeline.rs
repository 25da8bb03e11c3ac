use std::collections::HashMap;

use crate::grain::GrainLookup;
use crate::marking::MarkingConfig;
use crate::normalize::Normalizer;
use crate::rotation;
use crate::sequence::sequence;
use crate::types::{NormalizedPart, PanelRole, PartPlacement, RawPanel, Rect};

/// Receives the prepared parts of each run. Does nothing by default.
pub trait PipelineObserver {
    fn on_prepared(&self, _parts: &[NormalizedPart], _counters: &HashMap<PanelRole, u32>) {}
}

pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs a per-part summary table at debug level.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_prepared(&self, parts: &[NormalizedPart], counters: &HashMap<PanelRole, u32>) {
        let locked = parts.iter().filter(|p| p.grain_locked()).count();
        tracing::debug!(total = parts.len(), locked, ?counters, "prepared parts");
        for p in parts {
            tracing::debug!(
                id = p.id(),
                role = %p.role(),
                dimensions = %p.nominal(),
                rotate = p.rotation_allowed(),
                laminate = p.laminate_code(),
                wood_grain = p.grain_locked()
            );
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareOptions {
    /// Write display dimensions back onto the caller's panels.
    pub backfill_display: bool,
}

/// Normalize, constrain and order panels for the optimizer.
pub struct Pipeline<'a, G: GrainLookup + ?Sized> {
    grain: &'a G,
    observer: &'a dyn PipelineObserver,
    options: PrepareOptions,
}

impl<'a, G: GrainLookup + ?Sized> Pipeline<'a, G> {
    pub fn new(grain: &'a G) -> Self {
        Self {
            grain,
            observer: &NoopObserver,
            options: PrepareOptions::default(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn PipelineObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_options(mut self, options: PrepareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn prepare(&self, panels: &[RawPanel]) -> Vec<NormalizedPart> {
        let mut normalizer = Normalizer::new(self.grain);
        let parts = panels
            .iter()
            .enumerate()
            .map(|(idx, raw)| normalizer.normalize(raw, idx))
            .collect();
        self.finish(parts, normalizer.counters())
    }

    /// Like [`Pipeline::prepare`], also backfilling display fields when
    /// [`PrepareOptions::backfill_display`] is set.
    pub fn prepare_mut(&self, panels: &mut [RawPanel]) -> Vec<NormalizedPart> {
        if !self.options.backfill_display {
            return self.prepare(panels);
        }
        let mut normalizer = Normalizer::new(self.grain);
        let parts = panels
            .iter_mut()
            .enumerate()
            .map(|(idx, raw)| normalizer.normalize_with_backfill(raw, idx))
            .collect();
        self.finish(parts, normalizer.counters())
    }

    fn finish(
        &self,
        mut parts: Vec<NormalizedPart>,
        counters: &HashMap<PanelRole, u32>,
    ) -> Vec<NormalizedPart> {
        parts.iter_mut().for_each(rotation::apply);
        let parts = sequence(parts);
        self.observer.on_prepared(&parts, counters);
        parts
    }
}

pub fn prepare_parts<G: GrainLookup + ?Sized>(panels: &[RawPanel], grain: &G) -> Vec<NormalizedPart> {
    Pipeline::new(grain).prepare(panels)
}

/// Copies optimizer geometry onto the matching parts by id.
/// Returns the placements whose id matched no part.
pub fn apply_placements<'p>(
    parts: &mut [NormalizedPart],
    placements: &'p [PartPlacement],
) -> Vec<&'p PartPlacement> {
    let index: HashMap<String, usize> = parts
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id().to_string(), i))
        .collect();
    let mut unmatched = Vec::new();
    for placement in placements {
        match index.get(&placement.id) {
            Some(&i) => parts[i].apply_placement(Rect::new(placement.w, placement.h)),
            None => {
                tracing::warn!(id = %placement.id, "placement for unknown part");
                unmatched.push(placement);
            }
        }
    }
    unmatched
}

/// Markings for every eligible part, keyed by part id, in part order.
pub fn markings(parts: &[NormalizedPart]) -> Vec<(&str, MarkingConfig)> {
    parts
        .iter()
        .filter_map(|p| p.marking().map(|m| (p.id(), m)))
        .collect()
}
