//! Algebraic type classes used by the effect carriers.
//!
//! Writer-style effects accumulate their output through [`Semigroup`] and
//! [`Monoid`], so any log type with an associative combine and an identity
//! element can serve as a writer log.

mod monoid;
mod semigroup;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
