//! SLI IR - shared identity types for the SLI runtime.
//!
//! This crate contains the leaf data structures every other crate agrees on:
//! - `Name` for interned identifiers (dictionary keys, literal and executable names)
//! - `StringInterner` / `SharedInterner` for the process-wide name table
//! - `Span` / `Location` for positions reported by the front end
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: two spellings that are equal are the same `Name`,
//!   so dictionary lookups and name comparisons are a single `u32 == u32`.
//! - **No interpreter state here**: values, stacks and dictionaries live in
//!   `sli_eval`; this crate only owns identity.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::{Location, Span};

static_assert_size!(Name, 4);
static_assert_size!(Span, 8);
