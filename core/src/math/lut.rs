//! Lookup tables.
//!
//! Every table used by the crate is generated by the build script and
//! linked in as an immutable static. The core relies only on the length and
//! element width of each table. Entries are read through [`Table::get`],
//! which is the one place a platform with a special read path for constant
//! data (such as separate program memory) needs to change.

use core::fmt::{self, Debug, Formatter};

/// A fixed-length, immutable lookup table.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct Table<T, const N: usize>([T; N]);

impl<T: Copy, const N: usize> Table<T, N> {
    /// Returns a new table with the given entries.
    pub const fn new(entries: [T; N]) -> Self {
        Self(entries)
    }

    /// Returns the entry at index `i`.
    ///
    /// # Panics
    /// If `i >= N`. Every caller in this crate masks or clamps its index.
    #[inline(always)]
    pub fn get(&self, i: usize) -> T {
        self.0[i]
    }

    /// Returns the number of entries in `self`.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns whether `self` has no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Returns the entries of `self` as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Debug, const N: usize> Debug for Table<T, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Table<{N}>")?;
        f.debug_list().entries(&self.0).finish()
    }
}

include!(concat!(env!("OUT_DIR"), "/tables.rs"));
