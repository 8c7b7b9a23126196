use super::common::{Direction, Script, ShaperFlags};
use super::face::hb_face_t;
use super::font::FontFuncs;
use super::heuristics::GlyphLayout;

/// One script run to shape, with the buffers the result is written into.
///
/// The run is `string[from..from + length]`; the whole paragraph is passed so
/// engines can look at context. `glyphs` bounds the number of output glyphs
/// and `log_clusters` receives one entry per code unit of the run.
pub struct hb_shaper_item_t<'a, 'f> {
    pub string: &'a [u16],
    pub from: usize,
    pub length: usize,
    pub script: Script,
    pub bidi_level: u8,
    pub font: &'a dyn FontFuncs,
    pub face: Option<&'a mut hb_face_t<'f>>,
    pub glyphs: &'a mut [GlyphLayout],
    pub log_clusters: &'a mut [u16],
    pub flags: ShaperFlags,
    /// Glyphs written by the last successful shaping call.
    pub num_glyphs: usize,
}

impl<'a, 'f> hb_shaper_item_t<'a, 'f> {
    /// An item covering all of `string`.
    pub fn new(
        string: &'a [u16],
        script: Script,
        font: &'a dyn FontFuncs,
        glyphs: &'a mut [GlyphLayout],
        log_clusters: &'a mut [u16],
    ) -> Self {
        Self {
            string,
            from: 0,
            length: string.len(),
            script,
            bidi_level: 0,
            font,
            face: None,
            glyphs,
            log_clusters,
            flags: ShaperFlags::empty(),
            num_glyphs: 0,
        }
    }

    /// The code units being shaped.
    #[inline]
    pub fn run(&self) -> &'a [u16] {
        let end = (self.from + self.length).min(self.string.len());
        &self.string[self.from.min(end)..end]
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from_bidi_level(self.bidi_level)
    }

    /// Room in the output glyph buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.glyphs.len()
    }

    pub fn with_face(mut self, face: &'a mut hb_face_t<'f>) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_range(mut self, from: usize, length: usize) -> Self {
        self.from = from;
        self.length = length;
        self
    }

    pub fn with_bidi_level(mut self, bidi_level: u8) -> Self {
        self.bidi_level = bidi_level;
        self
    }

    pub fn with_flags(mut self, flags: ShaperFlags) -> Self {
        self.flags = flags;
        self
    }
}
