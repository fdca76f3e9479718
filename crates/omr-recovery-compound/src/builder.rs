use std::cmp::Ordering;

use log::debug;
use omr_recovery_core::{
    classify, CompoundGlyph, Evaluation, Glyph, GlyphGeometry, GlyphPool, PixelRect,
    ShapeClassifier,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::subsets::{adjacency_masks, bits, connected_subsets, MAX_GRAPH_NODES};
use crate::{CompoundError, CompoundParams, RecoveryAdapter};

/// Builds the best-evaluated compound around an adapter's reference box.
#[derive(Clone, Debug, Default)]
pub struct CompoundBuilder {
    params: CompoundParams,
}

struct Scored {
    compound: CompoundGlyph,
    evaluation: Evaluation,
    distance: f32,
    members: u32,
}

impl Scored {
    fn is_better_than(&self, other: &Scored) -> bool {
        let by_grade = self
            .evaluation
            .grade
            .partial_cmp(&other.evaluation.grade)
            .unwrap_or(Ordering::Equal);
        match by_grade {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.distance.partial_cmp(&other.distance) {
                Some(Ordering::Less) => true,
                Some(Ordering::Greater) => false,
                _ => self.members < other.members,
            },
        }
    }
}

impl CompoundBuilder {
    pub fn new(params: CompoundParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &CompoundParams {
        &self.params
    }

    /// Search `pool` for the best compound accepted by `adapter`.
    ///
    /// Returns `Ok(None)` when no aggregate reaches the adapter's minimum
    /// grade. The returned compound carries the adapter's chosen evaluation and
    /// is not linked into the pool.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip_all,
            fields(shapes = adapter.admissible_shapes().name(), pool = pool.len())
        )
    )]
    pub fn build_compound(
        &self,
        pool: &GlyphPool,
        adapter: &dyn RecoveryAdapter,
        classifier: &dyn ShapeClassifier,
    ) -> Result<Option<CompoundGlyph>, CompoundError> {
        let reference = adapter.reference_box();
        let candidates = self.gather_candidates(pool, adapter, &reference);
        if candidates.is_empty() {
            debug!("no candidate glyph around {:?}", reference);
            return Ok(None);
        }

        let bounds: Vec<PixelRect> = candidates.iter().map(|g| g.bounds()).collect();
        let adjacency = adjacency_masks(&bounds, self.params.adjacency_gap);
        let subsets = connected_subsets(
            &adjacency,
            self.params.max_members.max(1),
            self.params.max_subsets,
        );

        let shapes = adapter.admissible_shapes();
        let min_grade = adapter.minimum_grade();
        let mut best: Option<Scored> = None;

        for mask in &subsets {
            let Some(compound) = CompoundGlyph::merge(bits(*mask).map(|i| candidates[i])) else {
                continue;
            };
            let Some(evaluation) = classify(classifier, &compound, shapes, min_grade)? else {
                continue;
            };
            let scored = Scored {
                distance: compound.bounds().center_distance(&reference),
                members: mask.count_ones(),
                compound,
                evaluation,
            };
            if best.as_ref().map_or(true, |b| scored.is_better_than(b)) {
                best = Some(scored);
            }
        }

        debug!(
            "{} search: {} candidates, {} aggregates, best {:?}",
            shapes.name(),
            candidates.len(),
            subsets.len(),
            best.as_ref().map(|b| (b.evaluation.shape, b.evaluation.grade))
        );

        Ok(best.map(|b| {
            let chosen = adapter.chosen_evaluation(b.evaluation);
            b.compound.with_evaluation(chosen)
        }))
    }

    /// Suitable glyphs overlapping or adjacent to the reference box, closest
    /// first.
    fn gather_candidates<'p>(
        &self,
        pool: &'p GlyphPool,
        adapter: &dyn RecoveryAdapter,
        reference: &PixelRect,
    ) -> Vec<&'p Glyph> {
        // Adjacent to the box means within `adjacency_gap`, as between glyphs.
        let reach = self.params.box_margin + self.params.adjacency_gap;
        let area = reference.grow(reach, reach);
        let center = reference.center();

        let mut candidates: Vec<(&Glyph, f32)> = pool
            .iter()
            .filter(|g| g.is_active())
            .filter(|g| self.params.include_manual_shapes || !g.is_manual_shape())
            .filter(|g| g.bounds().intersects(&area))
            .filter(|g| adapter.is_candidate_suitable(g))
            .map(|g| (g, nalgebra::distance(&g.centroid(), &center)))
            .collect();

        candidates.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id().cmp(&b.0.id()))
        });
        candidates.truncate(self.params.max_candidates.min(MAX_GRAPH_NODES));
        candidates.into_iter().map(|(g, _)| g).collect()
    }
}
