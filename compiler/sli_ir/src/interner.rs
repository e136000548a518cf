//! The name table: a sharded, append-only string interner.
//!
//! Spellings are leaked on first use and never freed, so a `Name` stays
//! valid (and its spelling `'static`) for the life of the process. Each
//! shard sits behind its own `RwLock`; the host may resolve names from
//! other threads while an interpreter runs.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use super::Name;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("name table shard {shard} is full ({max} names)", max = Name::MAX_SLOT)]
pub struct InternError {
    pub shard: usize,
}

#[derive(Default)]
struct Shard {
    ids: FxHashMap<&'static str, Name>,
    spellings: Vec<&'static str>,
}

impl Shard {
    fn insert(&mut self, index: usize, spelling: &str) -> Result<Name, InternError> {
        let slot = u32::try_from(self.spellings.len())
            .ok()
            .filter(|slot| *slot <= Name::MAX_SLOT)
            .ok_or(InternError { shard: index })?;
        let leaked: &'static str = Box::leak(spelling.to_owned().into_boxed_str());
        let name = Name::from_parts(index, slot);
        self.spellings.push(leaked);
        self.ids.insert(leaked, name);
        Ok(name)
    }
}

/// Maps spellings to `Name`s and back.
pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
    count: AtomicUsize,
}

impl StringInterner {
    /// An empty table holding only `""` as [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut first = Shard::default();
        first.spellings.push("");
        first.ids.insert("", Name::EMPTY);
        let mut first = Some(first);
        StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(first.take().unwrap_or_default())),
            count: AtomicUsize::new(1),
        }
    }

    fn shard_of(spelling: &str) -> usize {
        if spelling.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        spelling.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let shard = (hasher.finish() as usize) % Name::SHARDS;
        shard
    }

    /// The `Name` of `spelling`, if it was interned before.
    pub fn get(&self, spelling: &str) -> Option<Name> {
        let index = Self::shard_of(spelling);
        self.shards[index].read().ids.get(spelling).copied()
    }

    /// Intern `spelling`, failing only when its shard is full.
    pub fn try_intern(&self, spelling: &str) -> Result<Name, InternError> {
        if let Some(name) = self.get(spelling) {
            return Ok(name);
        }
        let index = Self::shard_of(spelling);
        let mut shard = self.shards[index].write();
        // Another thread may have won the race for the write lock.
        if let Some(&name) = shard.ids.get(spelling) {
            return Ok(name);
        }
        let name = shard.insert(index, spelling)?;
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(name)
    }

    /// Intern `spelling`.
    ///
    /// # Panics
    /// When a shard holds `Name::MAX_SLOT` spellings already; no script gets
    /// near that.
    #[inline]
    pub fn intern(&self, spelling: &str) -> Name {
        self.try_intern(spelling).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Spelling of `name`; `""` for a name from another table.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.shards
            .get(name.shard())
            .and_then(|shard| shard.read().spellings.get(name.slot()).copied())
            .unwrap_or("")
    }

    /// Number of spellings, `""` included.
    pub fn len(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// True while only `""` is present.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Anything that can spell a `Name`.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

impl StringLookup for SharedInterner {
    fn lookup(&self, name: Name) -> &str {
        self.0.lookup(name)
    }
}

/// Handle to one name table shared by the interpreter, its front end and the
/// host.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for SharedInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedInterner({} names)", self.0.len())
    }
}
