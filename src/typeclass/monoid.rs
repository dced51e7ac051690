//! Monoid type class - semigroups with an identity element.
//!
//! # Laws
//!
//! For all `a` of type `T`:
//!
//! ## Left identity
//!
//! ```text
//! T::empty().combine(a) == a
//! ```
//!
//! ## Right identity
//!
//! ```text
//! a.combine(T::empty()) == a
//! ```

use super::Semigroup;

/// A type class for semigroups with an identity element.
///
/// # Examples
///
/// ```rust
/// use algeff::typeclass::{Monoid, Semigroup};
///
/// assert_eq!(String::empty(), "");
/// assert_eq!(String::empty().combine(String::from("log")), "log");
/// ```
pub trait Monoid: Semigroup {
    /// Returns the identity element of `combine`.
    #[must_use]
    fn empty() -> Self;

    /// Combines every element of an iterator, starting from the identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use algeff::typeclass::Monoid;
    ///
    /// let combined = String::combine_all(vec!["a".to_string(), "b".to_string()]);
    /// assert_eq!(combined, "ab");
    /// ```
    #[must_use]
    fn combine_all<I: IntoIterator<Item = Self>>(items: I) -> Self
    where
        Self: Sized,
    {
        items
            .into_iter()
            .fold(Self::empty(), Semigroup::combine)
    }
}

impl Monoid for String {
    fn empty() -> Self {
        Self::new()
    }
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Self::new()
    }
}

impl Monoid for () {
    fn empty() -> Self {}
}

impl<A: Monoid, B: Monoid> Monoid for (A, B) {
    fn empty() -> Self {
        (A::empty(), B::empty())
    }
}

impl<T: Semigroup> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn empty_is_left_identity_for_string() {
        assert_eq!(String::empty().combine("trace".to_string()), "trace");
    }

    #[rstest]
    fn empty_is_right_identity_for_vec() {
        assert_eq!(vec![1, 2].combine(Vec::empty()), vec![1, 2]);
    }

    #[rstest]
    fn combine_all_folds_in_order() {
        let logs = vec![vec!["a"], vec!["b"], vec!["c"]];
        assert_eq!(Vec::combine_all(logs), vec!["a", "b", "c"]);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn string_identity_laws(a in ".*") {
                prop_assert_eq!(String::empty().combine(a.clone()), a.clone());
                prop_assert_eq!(a.clone().combine(String::empty()), a);
            }
        }
    }
}
