use alloc::collections::TryReserveError;

use read_fonts::ReadError;
use thiserror::Error;

use super::common::Script;
use super::hb_tag_t;

/// Errors reported by [`shape_item`](crate::shape_item) and face construction.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The output glyph buffer is too small. Nothing was written; retry with
    /// at least `required` slots.
    #[error("glyph buffer too small: {required} glyphs required")]
    Capacity { required: usize },

    /// The log-cluster buffer holds fewer entries than the run has code
    /// units. Nothing was written.
    #[error("log cluster buffer too small: {required} code units required")]
    LogClusterCapacity { required: usize },

    /// The run produced more glyphs than a `u16` log cluster can index.
    #[error("{glyphs} glyphs cannot be addressed by 16-bit log clusters")]
    ClusterOverflow { glyphs: usize },

    /// The script has no implemented engine (or was left unresolved as `Inherited`).
    #[error("no shaping engine implemented for {0:?}")]
    Unsupported(Script),

    /// The font backend failed to produce one glyph per scalar value.
    #[error("font backend failed to map text to glyphs")]
    FontBackend,

    /// A scratch allocation failed.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Why a layout table could not be opened for a face.
///
/// Neither case is fatal: the face treats the table as absent.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table '{0}' not present")]
    Missing(hb_tag_t),

    #[error("table '{tag}' could not be read: {error}")]
    Invalid { tag: hb_tag_t, error: ReadError },
}

impl TableError {
    pub(crate) fn from_read_error(tag: hb_tag_t, error: ReadError) -> Self {
        match error {
            ReadError::TableIsMissing(_) => Self::Missing(tag),
            error => Self::Invalid { tag, error },
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}
