//! The effectful computation type [`Eff`] and the `send` entry point.
//!
//! `Eff<S, A>` is either a pure value or one pending operation of the
//! signature `S` whose continuation is another `Eff<S, A>`. Sequencing is
//! ordinary functor mapping over the continuation slot, so a program is a
//! tree of operations evaluated by plain nested calls when a carrier runs it.
//!
//! Operation result types are erased to [`Erased`] at the `send` site and
//! recovered by downcast inside the continuation; a failed downcast is a bug
//! in an effect definition, not a user error, and panics.

use std::rc::Rc;

use crate::algebra::member::Member;
use crate::algebra::signature::{Erased, Kont, Signature};

/// An effectful computation over signature `S` producing an `A`.
///
/// # Examples
///
/// ```rust
/// use algeff::algebra::{Algebra, Eff};
/// use algeff::effects::{ErrorCarrier, throw};
///
/// let program: Eff<_, i32> = Eff::pure(2).fmap(|value| value * 3);
/// let result = ErrorCarrier::<String>::default().run(program);
/// assert_eq!(result, Ok(6));
/// ```
pub enum Eff<S: Signature, A: 'static> {
    /// A finished computation.
    Pure(A),
    /// One pending operation; the `K` slot holds the rest of the program.
    Op(Box<S::Op<Eff<S, Erased>, Eff<S, A>>>),
}

impl<S: Signature, A: 'static> Eff<S, A> {
    /// Lifts a value into a computation with no pending operations.
    pub const fn pure(value: A) -> Self {
        Self::Pure(value)
    }

    /// Returns `true` when no operations are pending.
    pub const fn is_pure(&self) -> bool {
        matches!(self, Self::Pure(_))
    }

    /// Injects one operation of a member signature into the ambient sum.
    ///
    /// This is the single entry point through which effect constructors
    /// build computations; the `Index` parameter is inferred from the
    /// position of `E` inside `S`.
    #[must_use]
    pub fn send<E: Signature, Index>(operation: E::Op<Eff<S, Erased>, Self>) -> Self
    where
        S: Member<E, Index>,
    {
        Self::Op(Box::new(S::inject(operation)))
    }

    /// Monadic sequencing: feeds the result into `function` once the
    /// computation finishes.
    #[must_use]
    pub fn flat_map<B: 'static, F>(self, function: F) -> Eff<S, B>
    where
        F: Fn(A) -> Eff<S, B> + 'static,
    {
        self.flat_map_shared(Rc::new(function))
    }

    fn flat_map_shared<B: 'static>(self, function: Rc<dyn Fn(A) -> Eff<S, B>>) -> Eff<S, B> {
        match self {
            Self::Pure(value) => function(value),
            Self::Op(operation) => Eff::Op(Box::new(S::map_continuation(
                *operation,
                Rc::new(move |rest: Self| rest.flat_map_shared(function.clone())),
            ))),
        }
    }

    /// Alias for [`Eff::flat_map`].
    #[must_use]
    pub fn and_then<B: 'static, F>(self, function: F) -> Eff<S, B>
    where
        F: Fn(A) -> Eff<S, B> + 'static,
    {
        self.flat_map(function)
    }

    /// Maps the final result.
    #[must_use]
    pub fn fmap<B: 'static, F>(self, function: F) -> Eff<S, B>
    where
        F: Fn(A) -> B + 'static,
    {
        self.flat_map(move |value| Eff::Pure(function(value)))
    }

    /// Sequences two computations, discarding the first result.
    #[must_use]
    pub fn then<B: 'static>(self, next: Eff<S, B>) -> Eff<S, B>
    where
        Eff<S, B>: Clone,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Combines the results of two computations, first-then-second.
    #[must_use]
    pub fn map2<B: 'static, C: 'static, F>(self, other: Eff<S, B>, function: F) -> Eff<S, C>
    where
        A: Clone,
        Eff<S, B>: Clone,
        F: Fn(A, B) -> C + Clone + 'static,
    {
        self.flat_map(move |value_a| {
            let function = function.clone();
            other
                .clone()
                .fmap(move |value_b| function(value_a.clone(), value_b))
        })
    }

    /// Pairs the results of two computations.
    #[must_use]
    pub fn product<B: 'static>(self, other: Eff<S, B>) -> Eff<S, (A, B)>
    where
        A: Clone,
        Eff<S, B>: Clone,
    {
        self.map2(other, |value_a, value_b| (value_a, value_b))
    }

    /// Erases the result type behind `Box<dyn Any>`.
    ///
    /// Effect constructors erase scoped bodies with this before handing them
    /// to a signature, and recover the type with [`downcast_continuation`].
    #[must_use]
    pub fn erase(self) -> Eff<S, Erased> {
        self.flat_map(|value| Eff::Pure(Box::new(value) as Erased))
    }
}

impl<S: Signature, A: Clone + 'static> Clone for Eff<S, A>
where
    S::Op<Eff<S, Erased>, Eff<S, A>>: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::Pure(value) => Self::Pure(value.clone()),
            Self::Op(operation) => Self::Op(operation.clone()),
        }
    }
}

/// The continuation that undoes [`Eff::erase`] for results of type `A`.
///
/// # Panics
///
/// The returned continuation panics if fed a value erased from a different
/// type; that indicates a mismatched effect definition.
#[must_use]
pub fn downcast_continuation<S: Signature, A: 'static>() -> Kont<Erased, Eff<S, A>> {
    Rc::new(|erased: Erased| {
        Eff::Pure(
            *erased
                .downcast::<A>()
                .expect("Type mismatch in effect continuation"),
        )
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::effects::state::{State, get, put};
    use crate::effects::{LiftCarrier, StateLayer};

    type Sig = State<i32>;
    type Stack = crate::Signatures![Sig, crate::effects::Lift];

    fn run(program: Eff<Stack, i32>) -> (i32, i32) {
        StateLayer::new(LiftCarrier).run_state(1, program)
    }

    #[rstest]
    fn left_identity() {
        let with_pure = Eff::pure(4).flat_map(|value: i32| put(value).then(get()));
        let direct = put(4).then(get());
        assert_eq!(run(with_pure), run(direct));
    }

    #[rstest]
    fn right_identity() {
        let wrapped = get().flat_map(Eff::pure);
        let direct = get();
        assert_eq!(run(wrapped), run(direct));
    }

    #[rstest]
    fn associativity() {
        let left = get()
            .flat_map(|state: i32| put(state + 1).then(get()))
            .flat_map(|state: i32| Eff::pure(state * 2));
        let right = get().flat_map(|state: i32| {
            put(state + 1).then(get()).flat_map(|state: i32| Eff::pure(state * 2))
        });
        assert_eq!(run(left), run(right));
    }

    #[rstest]
    fn erase_round_trips_through_downcast() {
        let program: Eff<Sig, i32> = Eff::pure(9);
        let erased = program.erase();
        let recovered = erased.flat_map(move |boxed| downcast_continuation::<Sig, i32>()(boxed));
        assert!(matches!(recovered, Eff::Pure(9)));
    }

    #[rstest]
    fn map2_combines_in_order() {
        let program: Eff<Stack, (i32, i32)> = put(5).then(
            get().map2(get().fmap(|state: i32| state + 1), |first, second| {
                (first, second)
            }),
        );
        assert_eq!(
            StateLayer::new(LiftCarrier).run_state(0, program),
            (5, (5, 6))
        );
    }
}
