use read_fonts::{
    tables::{
        gsub::{ExtensionSubstFormat1, Gsub, SingleSubst, SingleSubstFormat1, SingleSubstFormat2},
        layout::Lookup,
    },
    FontData, FontRead, Offset, ReadError,
};
use smallvec::SmallVec;

pub mod lookup_flags {
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
}

pub trait LookupHost<'a> {
    fn lookup_count(&self) -> u16;
    fn lookup_data(&self, index: u16) -> Result<LookupData<'a>, ReadError>;
}

impl<'a> LookupHost<'a> for Gsub<'a> {
    fn lookup_count(&self) -> u16 {
        self.lookup_list()
            .map(|list| list.lookup_count())
            .unwrap_or_default()
    }

    fn lookup_data(&self, index: u16) -> Result<LookupData<'a>, ReadError> {
        let list = self.lookup_list()?;
        let offset = list
            .lookup_offsets()
            .get(index as usize)
            .ok_or(ReadError::OutOfBounds)?
            .get()
            .to_usize()
            + self.lookup_list_offset().to_usize();
        Ok(LookupData {
            offset,
            table_data: self.offset_data(),
        })
    }
}

pub struct LookupData<'a> {
    /// Offset of the lookup from the base of the table.
    offset: usize,
    /// Data of the layout table.
    table_data: FontData<'a>,
}

/// GSUB subtables the built-in engine knows how to run.
#[derive(Clone)]
pub enum Subtable<'a> {
    SingleSubst1(SingleSubstFormat1<'a>),
    SingleSubst2(SingleSubstFormat2<'a>),
    /// Any other lookup type, by its (extension-resolved) type number.
    Other(u16),
}

impl<'a> Subtable<'a> {
    fn read(data: FontData<'a>, lookup_type: u16) -> Result<Self, ReadError> {
        match lookup_type {
            1 => match SingleSubst::read(data)? {
                SingleSubst::Format1(s) => Ok(Self::SingleSubst1(s)),
                SingleSubst::Format2(s) => Ok(Self::SingleSubst2(s)),
            },
            7 => {
                let ext = ExtensionSubstFormat1::<'a, ()>::read(data)?;
                let ext_type = ext.extension_lookup_type();
                let offset = ext.extension_offset().to_usize();
                let data = data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
                Self::read(data, ext_type)
            }
            kind => Ok(Self::Other(kind)),
        }
    }
}

/// A lookup with its flags and readable subtables.
pub struct ResolvedLookup<'a> {
    pub flags: u16,
    pub subtables: SmallVec<[Subtable<'a>; 4]>,
}

pub fn resolve_lookup<'a>(
    host: &impl LookupHost<'a>,
    index: u16,
) -> Result<ResolvedLookup<'a>, ReadError> {
    if index >= host.lookup_count() {
        return Err(ReadError::OutOfBounds);
    }
    let data = host.lookup_data(index)?;
    let lookup_data = data
        .table_data
        .split_off(data.offset)
        .ok_or(ReadError::OutOfBounds)?;
    let lookup: Lookup<()> = Lookup::read(lookup_data)?;
    let kind = lookup.lookup_type();
    let mut subtables = SmallVec::new();
    for subtable_offset in lookup.subtable_offsets() {
        let subtable_offset = subtable_offset.get().to_usize() + data.offset;
        let Some(subtable_data) = data.table_data.split_off(subtable_offset) else {
            continue;
        };
        // Just drop subtables with errors
        if let Ok(subtable) = Subtable::read(subtable_data, kind) {
            subtables.push(subtable);
        }
    }
    Ok(ResolvedLookup {
        flags: lookup.lookup_flag().to_bits(),
        subtables,
    })
}
