//! Aliased, interior-mutable handles for dictionaries, tries and streams.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A single-threaded shared handle with interior mutability.
///
/// Dictionaries referenced from several scopes are aliased, not copied:
/// every clone of a `LocalScope` sees writes made through any other clone.
/// An explicit private copy (`clonedict`) builds a fresh `LocalScope`.
///
/// `LocalScope<T>` uses `Rc` and is not `Send`; one interpreter instance owns
/// all of its values.
#[repr(transparent)]
pub struct LocalScope<T: ?Sized>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }
}

impl<T: ?Sized> LocalScope<T> {
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Panics if a borrow is outstanding; primitives never hold one across
    /// a call back into the loop.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Identity, not content: `eq` on dictionaries and tries uses this.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: ?Sized> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}
