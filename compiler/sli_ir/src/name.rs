//! `Name`: the identity of an interned spelling.
//!
//! Literal names (`/foo`) and executable names (`foo`) share one `Name`; the
//! flavor lives on the value, not on the identifier. Dictionary keys are
//! `Name`s, so a lookup never touches the spelling.

use std::fmt;

/// Index into the name table.
///
/// The low four bits select the shard and the rest is the slot inside it.
/// Two `Name`s from the same table are equal iff their spellings are.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
#[repr(transparent)]
pub struct Name(u32);

const SHARD_BITS: u32 = 4;

impl Name {
    /// The empty spelling, present in every table.
    pub const EMPTY: Name = Name(0);

    pub(crate) const SHARDS: usize = 1 << SHARD_BITS;
    pub(crate) const MAX_SLOT: u32 = u32::MAX >> SHARD_BITS;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_parts(shard: usize, slot: u32) -> Self {
        debug_assert!(shard < Self::SHARDS);
        debug_assert!(slot <= Self::MAX_SLOT);
        Name((slot << SHARD_BITS) | shard as u32)
    }

    #[inline]
    pub(crate) const fn shard(self) -> usize {
        (self.0 & ((1 << SHARD_BITS) - 1)) as usize
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0 >> SHARD_BITS) as usize
    }

    /// Raw bits, stable for the life of the table.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.slot())
    }
}
