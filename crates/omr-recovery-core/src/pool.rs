use serde::{Deserialize, Serialize};

use crate::glyph::filled_runs;
use crate::{CompoundGlyph, Glyph, GlyphId, PixelRect, PixelRun};

/// Arena of the glyphs found in one system.
///
/// Glyphs are addressed by [`GlyphId`], which is their index in the arena and
/// never changes. Searches borrow the pool immutably; the only structural
/// mutation is [`GlyphPool::commit`] of an accepted compound.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GlyphPool {
    glyphs: Vec<Glyph>,
}

impl GlyphPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a primitive glyph made of `runs`.
    pub fn add_runs(&mut self, runs: Vec<PixelRun>) -> GlyphId {
        let id = self.next_id();
        self.glyphs.push(Glyph::primitive(id, runs));
        id
    }

    /// Register a primitive glyph filling `rect` completely.
    pub fn add_rect(&mut self, rect: PixelRect) -> GlyphId {
        self.add_runs(filled_runs(rect))
    }

    /// Register an accepted compound and link its constituents to it.
    pub fn commit(&mut self, compound: CompoundGlyph) -> GlyphId {
        let id = self.next_id();
        let members: Vec<GlyphId> = crate::GlyphGeometry::members(&compound).to_vec();
        self.glyphs.push(Glyph::from_compound(id, compound));
        for member in members {
            if let Some(glyph) = self.get_mut(member) {
                glyph.set_part_of(id);
            }
        }
        id
    }

    pub fn get(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: GlyphId) -> Option<&mut Glyph> {
        self.glyphs.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Ids of the glyphs accepted by `pred`, in arena order.
    pub fn select_ids(&self, mut pred: impl FnMut(&Glyph) -> bool) -> Vec<GlyphId> {
        self.glyphs
            .iter()
            .filter(|g| pred(g))
            .map(Glyph::id)
            .collect()
    }

    /// Attach a named debug box to a glyph. Returns `false` if the id is unknown.
    pub fn attach(&mut self, id: GlyphId, name: impl Into<String>, rect: PixelRect) -> bool {
        match self.get_mut(id) {
            Some(glyph) => {
                glyph.add_attachment(name.into(), rect);
                true
            }
            None => false,
        }
    }

    fn next_id(&self) -> GlyphId {
        GlyphId(self.glyphs.len() as u32)
    }
}
